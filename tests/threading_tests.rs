use fast_image_filters as ff;
use testing::pattern_image;


fn assert_same_pixels(actual: &ff::FloatImage, expected: &ff::FloatImage) {
    for y in 0..expected.height() {
        assert_eq!(actual.row(y), expected.row(y), "row {}", y);
    }
}

#[test]
fn parallel_convolution() {
    let mut image = pattern_image(512, 300, 4);
    let mut expected = image.copy();

    let mut kernel = ff::ConvolutionKernel::gaussian_normalized(2., 6).unwrap();
    kernel.set_thresholds(0.01, 0.8);
    ff::convolve_rows(&mut expected, &mut kernel, 3, 0, None).unwrap();
    ff::par_convolve(&mut image, &mut kernel, 3).unwrap();

    assert_same_pixels(&image, &expected);
}

#[test]
fn parallel_box_blur() {
    let mut image = pattern_image(256, 513, 3);
    let mut expected = image.copy();

    let mut kernel = ff::ConvolutionKernel::new(3).unwrap();
    ff::boxblur_rows(&mut expected, 3, 2, 3, &mut kernel, 0, None).unwrap();
    ff::par_boxblur(&mut image, 3, 2, 3, &mut kernel).unwrap();

    assert_same_pixels(&image, &expected);
}

#[test]
fn parallel_gaussian_blur() {
    for sigma in [1.5, 3.] {
        let mut image = pattern_image(300, 400, 2);
        let mut expected = image.copy();

        let mut kernel = ff::ConvolutionKernel::new(4).unwrap();
        ff::approx_gaussian_blur_rows(&mut expected, sigma, &mut kernel, 0, None).unwrap();
        ff::par_approx_gaussian_blur(&mut image, sigma, &mut kernel).unwrap();

        assert_same_pixels(&image, &expected);
    }
}

#[test]
fn parallel_sharpen() {
    let mut image = pattern_image(400, 257, 1);
    let mut expected = image.copy();

    ff::sharpen_rows(&mut expected, 0, 257, 0.3).unwrap();
    ff::par_sharpen(&mut image, 0.3).unwrap();

    assert_same_pixels(&image, &expected);
}

#[test]
fn parallel_errors() {
    let mut image = pattern_image(100, 100, 3);
    let mut kernel = ff::ConvolutionKernel::new(1).unwrap();
    let res = ff::par_approx_gaussian_blur(&mut image, 5., &mut kernel);
    assert!(res.is_err());
    let res = ff::par_convolve(&mut image, &mut kernel, 4);
    assert!(res.is_err());
    let res = ff::par_sharpen(&mut image, 1.);
    assert!(res.is_err());
}
