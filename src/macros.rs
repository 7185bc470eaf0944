/// Assert that the floating point numbers are equal within the given epsilon.
#[cfg(test)]
macro_rules! assert_float_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {{
        // Make variables to avoid evaluating experssions multiple times.
        let a: f64 = $a;
        let b: f64 = $b;
        let eps: f64 = $eps;
        let error = (a - b).abs();
        if error > eps {
            eprintln!("{:?}", $debug);
        }
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}",
            a,
            b,
            error,
            eps
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a, $b, $eps, "")
    };
    ($a:expr, $b:expr) => {
        $crate::macros::assert_float_eq!($a, $b, f64::EPSILON, "")
    };
}

/// Assert that two points are within `eps` of each other, coordinate-wise.
#[cfg(test)]
macro_rules! assert_point_eq {
    ($a:expr, $b:expr, $eps:expr) => {{
        let a: glam::DVec3 = $a;
        let b: glam::DVec3 = $b;
        for i in 0..3 {
            $crate::macros::assert_float_eq!(a[i], b[i], $eps, (a, b));
        }
    }};
}

#[cfg(test)]
pub(crate) use assert_float_eq;
#[cfg(test)]
pub(crate) use assert_point_eq;
