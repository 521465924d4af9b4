/// contains some very simple helpers for 2d vectors

pub type Vector = [f64; 2];

/// calculates the length of a vector
pub fn len(inp: Vector) -> f64 {
    ((inp[0] * inp[0]) + (inp[1] * inp[1])).sqrt()
}

/// componet-wise addition
pub fn add(mut a: Vector, b: Vector) -> Vector {
    a[0] += b[0];
    a[1] += b[1];
    a
}

/// componet-wise subtraction, a - b
pub fn sub(mut a: Vector, b: Vector) -> Vector {
    a[0] -= b[0];
    a[1] -= b[1];
    a
}

/// scales a vector by a scalar
pub fn scale(mut a: Vector, scalar: f64) -> Vector {
    a[0] *= scalar;
    a[1] *= scalar;
    a
}

/// distance between two points
pub fn dist(a: Vector, b: Vector) -> f64 {
    len(sub(a, b))
}

/// unit vector pointing along the angle (radians)
pub fn heading(angle: f64) -> Vector {
    let (s, c) = angle.sin_cos();
    [c, s]
}

/// angle of the vector in radians, -pi..pi
/// atan2(0, 0) is 0, so two points on top of each other are pushed along +x
pub fn atan2(v: Vector) -> f64 {
    v[1].atan2(v[0])
}

#[test]
fn heading_is_unit() {
    for i in 0..16 {
        let angle = i as f64 * std::f64::consts::TAU / 16.;
        let h = heading(angle);
        assert!((len(h) - 1.).abs() < 1e-12);
        assert!((atan2(h) - angle).rem_euclid(std::f64::consts::TAU) < 1e-9
            || (atan2(h) - angle).rem_euclid(std::f64::consts::TAU) > std::f64::consts::TAU - 1e-9);
    }
}

#[test]
fn dist_symmetric() {
    let a = [3., 4.];
    let b = [0., 0.];
    assert_eq!(dist(a, b), 5.);
    assert_eq!(dist(b, a), 5.);
    assert_eq!(add(a, scale(b, 2.)), a);
}
