use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// A rigid-body transform: rotation about the origin followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Superposition {
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation.transform_point(point) + self.translation
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Finds the rotation and translation that minimize the RMSD of `mobile` onto `target`.
///
/// Uses the SVD of the cross-covariance matrix, correcting for improper rotations.
/// Returns `None` if the slices differ in length or are empty, if any coordinate is not
/// finite, or if the decomposition fails.
pub fn kabsch(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Option<Superposition> {
    if mobile.len() != target.len() {
        return None;
    }
    let mobile_center = centroid(mobile)?;
    let target_center = centroid(target)?;

    let h: Matrix3<f64> = mobile
        .iter()
        .zip(target)
        .fold(Matrix3::zeros(), |acc, (m, t)| {
            acc + (*m - mobile_center) * (*t - target_center).transpose()
        });
    if !h.iter().all(|v| v.is_finite()) {
        return None;
    }

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v = svd.v_t?.transpose();

    let mut r = v * u.transpose();
    if r.determinant() < 0.0 {
        let mut v_corrected = v;
        for i in 0..3 {
            v_corrected[(i, 2)] = -v_corrected[(i, 2)];
        }
        r = v_corrected * u.transpose();
    }

    let rotation = Rotation3::from_matrix_unchecked(r);
    let translation = target_center.coords - rotation * mobile_center.coords;
    Some(Superposition {
        rotation,
        translation,
    })
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5, 2.0, 0.3),
            Point3::new(-0.7, 1.1, 2.4),
            Point3::new(3.0, -1.2, 1.0),
        ]
    }

    #[test]
    fn calculate_rmsd_for_shifted_points() {
        let a = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let b = vec![Point3::new(0.0, 2.0, 0.0), Point3::new(1.0, 2.0, 0.0)];
        assert!(f64_approx_equal(calculate_rmsd(&a, &b).unwrap(), 2.0));
    }

    #[test]
    fn calculate_rmsd_rejects_mismatched_or_empty_input() {
        let a = vec![Point3::origin()];
        assert!(calculate_rmsd(&a, &[]).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }

    #[test]
    fn kabsch_recovers_known_rigid_transform() {
        let target = sample_points();
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(1.0, 2.0, -0.5)),
            1.1,
        );
        let shift = Vector3::new(4.0, -3.0, 10.0);
        let mobile: Vec<Point3<f64>> = target
            .iter()
            .map(|p| rotation.transform_point(p) + shift)
            .collect();

        let fit = kabsch(&mobile, &target).unwrap();
        let moved: Vec<Point3<f64>> = mobile.iter().map(|p| fit.apply(p)).collect();

        assert!(calculate_rmsd(&moved, &target).unwrap() < 1e-8);
        assert!(f64_approx_equal(fit.rotation.matrix().determinant(), 1.0));
    }

    #[test]
    fn kabsch_never_returns_a_reflection() {
        let target = sample_points();
        let mirrored: Vec<Point3<f64>> = target.iter().map(|p| Point3::new(-p.x, p.y, p.z)).collect();

        let fit = kabsch(&mirrored, &target).unwrap();
        assert!(f64_approx_equal(fit.rotation.matrix().determinant(), 1.0));
    }

    #[test]
    fn kabsch_rejects_invalid_input() {
        let points = sample_points();
        assert!(kabsch(&points, &points[..2]).is_none());
        assert!(kabsch(&[], &[]).is_none());

        let mut poisoned = points.clone();
        poisoned[1].y = f64::NAN;
        assert!(kabsch(&poisoned, &points).is_none());
    }

    #[test]
    fn centroid_of_points() {
        let c = centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, -3.0));
        assert!(centroid(&[]).is_none());
    }
}
