use approx::assert_relative_eq;

use fast_image_filters as ff;

#[test]
fn new_kernel_has_zero_weights() {
    let kernel = ff::ConvolutionKernel::new(2).unwrap();
    assert_eq!(kernel.radius(), 2);
    assert_eq!(kernel.width(), 5);
    assert_eq!(kernel.weights(), &[0.; 5]);
    assert_eq!(kernel.sum(), 0.);
    assert_eq!(kernel.threshold_min_change(), 0.);
    assert_eq!(kernel.threshold_max_change(), 0.);
    assert_eq!(kernel.edge_mode(), ff::EdgeMode::Renormalize);

    let kernel = ff::ConvolutionKernel::new(0).unwrap();
    assert_eq!(kernel.width(), 1);
}

#[test]
fn normalize_to_target_sum() {
    let mut kernel = ff::ConvolutionKernel::new(1).unwrap();
    kernel.weights_mut().copy_from_slice(&[1., 2., 1.]);
    assert_eq!(kernel.sum(), 4.);

    kernel.normalize(1.);
    assert_relative_eq!(kernel.sum(), 1., epsilon = 1e-6);
    assert_eq!(kernel.weights(), &[0.25, 0.5, 0.25]);

    kernel.normalize(3.);
    assert_relative_eq!(kernel.sum(), 3., epsilon = 1e-6);
}

#[test]
fn normalize_zero_kernel() {
    let mut kernel = ff::ConvolutionKernel::new(3).unwrap();
    kernel.normalize(1.);
    assert!(kernel.weights().iter().all(|&w| w == 0.));

    // Sum is zero but weights are not.
    kernel.weights_mut()[0] = 1.;
    kernel.weights_mut()[6] = -1.;
    kernel.normalize(1.);
    assert_eq!(kernel.weights()[0], 1.);
    assert_eq!(kernel.weights()[6], -1.);
}

#[test]
fn gaussian_is_symmetric_and_peaks_at_center() {
    let kernel = ff::ConvolutionKernel::gaussian(1.5, 4).unwrap();
    let weights = kernel.weights();
    assert_eq!(weights.len(), 9);
    for i in 0..4 {
        assert_eq!(weights[i], weights[8 - i]);
        assert!(weights[i] < weights[i + 1]);
    }
    // Density of normal distribution with sigma 1.5 at zero
    assert_relative_eq!(weights[4], 0.26596152, epsilon = 1e-6);
    // Not normalized, tails are cut off
    assert!(kernel.sum() < 1.);
}

#[test]
fn gaussian_normalized_is_symmetric() {
    for (sigma, radius) in [(0.8, 1), (1.5, 4), (3., 7), (10., 3)] {
        let kernel = ff::ConvolutionKernel::gaussian_normalized(sigma, radius).unwrap();
        let weights = kernel.weights();
        let width = weights.len();
        for i in 0..width {
            assert_eq!(weights[i], weights[width - 1 - i], "sigma {sigma}, tap {i}");
        }
        assert_relative_eq!(kernel.sum(), 1., epsilon = 1e-6);
    }
}

#[test]
fn gaussian_normalized_sums_to_one() {
    for (sigma, radius) in [(0.5, 1), (1., 3), (2.5, 8), (10., 30)] {
        let kernel = ff::ConvolutionKernel::gaussian_normalized(sigma, radius).unwrap();
        assert_relative_eq!(kernel.sum(), 1., epsilon = 1e-5);
    }
}

#[test]
fn gaussian_sharpen_kernel() {
    let gaussian = ff::ConvolutionKernel::gaussian(1., 2).unwrap();
    let sharpen = ff::ConvolutionKernel::gaussian_sharpen(1., 2).unwrap();
    assert_relative_eq!(sharpen.sum(), 1., epsilon = 1e-5);

    let g = gaussian.weights();
    let s = sharpen.weights();
    // Normalization factor of sharpen kernel is 1 / sum(gaussian)
    let factor = 1. / gaussian.sum() as f32;
    for i in [0, 1, 3, 4] {
        assert!(s[i] < 0.);
        assert_relative_eq!(s[i], -g[i] * factor, epsilon = 1e-6);
    }
    assert!(s[2] > 1.);
    assert_relative_eq!(s[2], (2. * gaussian.sum() as f32 - g[2]) * factor, epsilon = 1e-5);
}

#[test]
fn thresholds_and_edge_mode() {
    let mut kernel = ff::ConvolutionKernel::gaussian_normalized(1., 2).unwrap();
    kernel.set_thresholds(0.5, 4.);
    kernel.set_edge_mode(ff::EdgeMode::Clamp);
    assert_eq!(kernel.threshold_min_change(), 0.5);
    assert_eq!(kernel.threshold_max_change(), 4.);

    // Clone keeps configuration.
    let copy = kernel.clone();
    assert_eq!(copy.edge_mode(), ff::EdgeMode::Clamp);
    assert_eq!(copy.threshold_max_change(), 4.);
    assert_eq!(copy.weights(), kernel.weights());
}
