/// Sigma used when none is given: `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
///
/// This is the automatic-sigma rule common to 8-bit imaging libraries, so
/// a kernel size alone determines the blur.
pub fn auto_sigma(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Fixed binomial kernels used in place of the sampled Gaussian for the
/// smallest sizes, as 8-bit imaging libraries do when sigma is automatic.
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Precompute a normalized 1D Gaussian kernel of the given size.
///
/// Sizes up to 7 use the fixed binomial table; larger sizes sample a
/// Gaussian with [`auto_sigma`]. `kernel_size` must be odd and >= 1.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    if let Some(table) = SMALL_KERNELS.get(kernel_size / 2) {
        return table.to_vec();
    }
    let sigma = auto_sigma(kernel_size);
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Mirror an out-of-range index back into `0..len` without repeating the
/// edge sample (`dcb|abcd|cba`).
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// Blur a single-channel float plane in place with a separable kernel,
/// reusing `temp` as the intermediate buffer.
pub fn separable_blur_plane(
    plane: &mut [f32],
    width: usize,
    height: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = (kernel_size / 2) as isize;

    temp.clear();
    temp.resize(width * height, 0.0);

    // Horizontal pass: plane → temp
    for y in 0..height {
        let row = &plane[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - half, width);
                sum += row[sx] * w;
            }
            temp[y * width + x] = sum;
        }
    }

    // Vertical pass: temp → plane
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - half, height);
                sum += temp[sy * width + x] * w;
            }
            plane[y * width + x] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_auto_sigma_matches_rule() {
        assert_relative_eq!(auto_sigma(3), 0.8, epsilon = 1e-12);
        assert_relative_eq!(auto_sigma(5), 1.1, epsilon = 1e-12);
        assert_relative_eq!(auto_sigma(9), 1.7, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_1d(21);
        let sum: f32 = k.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
    }

    #[rstest]
    #[case(1, vec![1.0])]
    #[case(3, vec![0.25, 0.5, 0.25])]
    #[case(5, vec![0.0625, 0.25, 0.375, 0.25, 0.0625])]
    fn test_small_kernels_use_binomial_table(#[case] size: usize, #[case] expected: Vec<f32>) {
        assert_eq!(gaussian_kernel_1d(size), expected);
    }

    #[test]
    fn test_size_9_samples_auto_sigma() {
        let k = gaussian_kernel_1d(9);
        let sigma = auto_sigma(9);
        let ratio = (-16.0 / (2.0 * sigma * sigma)).exp() as f32;
        assert_relative_eq!(k[0] / k[4], ratio, epsilon = 1e-5);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let k = gaussian_kernel_1d(9);
        for i in 0..k.len() / 2 {
            assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-7);
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let k = gaussian_kernel_1d(7);
        let center = k[3];
        for (i, &v) in k.iter().enumerate() {
            if i != 3 {
                assert!(center > v);
            }
        }
    }

    #[rstest]
    #[case::inside(2, 5, 2)]
    #[case::one_before(-1, 5, 1)]
    #[case::two_before(-2, 5, 2)]
    #[case::one_after(5, 5, 3)]
    #[case::far_after(9, 5, 1)]
    #[case::single(-3, 1, 0)]
    fn test_reflect_101(#[case] i: isize, #[case] len: usize, #[case] expected: usize) {
        assert_eq!(reflect_101(i, len), expected);
    }

    #[test]
    fn test_uniform_plane_unchanged() {
        let mut plane = vec![1.0f32; 6 * 4];
        let kernel = gaussian_kernel_1d(21);
        let mut temp = Vec::new();
        separable_blur_plane(&mut plane, 6, 4, &kernel, &mut temp);
        for v in plane {
            assert_relative_eq!(v, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut plane: Vec<f32> = (0..25).map(|v| v as f32).collect();
        let original = plane.clone();
        let mut temp = Vec::new();
        separable_blur_plane(&mut plane, 5, 5, &[1.0], &mut temp);
        assert_eq!(plane, original);
    }

    #[test]
    fn test_point_spreads_to_neighbors() {
        let mut plane = vec![0.0f32; 9 * 9];
        plane[4 * 9 + 4] = 1.0;
        let kernel = gaussian_kernel_1d(5);
        let mut temp = Vec::new();
        separable_blur_plane(&mut plane, 9, 9, &kernel, &mut temp);
        assert!(plane[4 * 9 + 4] < 1.0);
        assert!(plane[4 * 9 + 5] > 0.0);
        assert!(plane[3 * 9 + 4] > 0.0);
        // Outside the kernel support nothing changes
        assert_eq!(plane[0], 0.0);
    }
}
