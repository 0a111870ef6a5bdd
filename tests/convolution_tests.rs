use fast_image_filters as ff;
use testing::{assert_all_components, assert_row_eq, flat_image, image_from_rows, single_row};


fn box_kernel(radius: u32) -> ff::ConvolutionKernel {
    let mut kernel = ff::ConvolutionKernel::new(radius).unwrap();
    kernel.weights_mut().fill(1.);
    kernel.normalize(1.);
    kernel
}

const THIRD: f32 = 100. / 3.;

#[test]
fn impulse_is_spread_between_neighbours() {
    let mut image = image_from_rows(
        3,
        &[&[0., 0., 0., 0., 0., 0., 100., 100., 100., 0., 0., 0., 0., 0., 0.]],
    );
    let mut kernel = box_kernel(1);
    ff::convolve_rows(&mut image, &mut kernel, 3, 0, None).unwrap();
    #[rustfmt::skip]
    let expected = [
        0., 0., 0.,
        THIRD, THIRD, THIRD,
        THIRD, THIRD, THIRD,
        THIRD, THIRD, THIRD,
        0., 0., 0.,
    ];
    assert_row_eq(&image, 0, &expected);
}

#[test]
fn weights_are_renormalized_at_edges() {
    let mut image = single_row(&[3., 0., 0., 0., 6.]);
    let mut kernel = box_kernel(1);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    // Edge pixels are averaged over two taps only.
    assert_row_eq(&image, 0, &[1.5, 1., 0., 2., 3.]);
}

#[test]
fn clamp_edge_mode() {
    let mut image = single_row(&[3., 0., 0., 0., 6.]);
    let mut kernel = box_kernel(1);
    kernel.set_edge_mode(ff::EdgeMode::Clamp);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_row_eq(&image, 0, &[2., 1., 0., 2., 4.]);
}

#[test]
fn flat_field_is_not_changed() {
    for radius in [1, 2, 5] {
        let mut image = flat_image(17, 3, 4, 0.75);
        let mut kernel = ff::ConvolutionKernel::gaussian_normalized(1.5, radius).unwrap();
        ff::convolve_rows(&mut image, &mut kernel, 4, 0, None).unwrap();
        assert_all_components(&image, 0.75);
    }
}

#[test]
fn sharpen_kernel_keeps_flat_field() {
    let mut image = flat_image(20, 2, 1, 0.5);
    let mut kernel = ff::ConvolutionKernel::gaussian_sharpen(1., 3).unwrap();
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_all_components(&image, 0.5);
}

#[test]
fn unsharp_kernel_increases_contrast_of_step() {
    let mut image = single_row(&[0., 0., 0., 0., 1., 1., 1., 1.]);
    let mut kernel = ff::ConvolutionKernel::gaussian_sharpen(1., 2).unwrap();
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    let row = image.row(0).unwrap();
    assert!(row[3] < 0.);
    assert!(row[4] > 1.);
}

#[test]
fn inactive_channels_are_not_changed() {
    let mut image = image_from_rows(
        4,
        &[&[
            0., 0., 0., 0.1, 0., 0., 0., 0.2, 9., 9., 9., 0.3, 0., 0., 0., 0.4, 0., 0., 0., 0.5,
        ]],
    );
    let mut kernel = box_kernel(1);
    ff::convolve_rows(&mut image, &mut kernel, 3, 0, None).unwrap();
    #[rustfmt::skip]
    let expected = [
        0., 0., 0., 0.1,
        3., 3., 3., 0.2,
        3., 3., 3., 0.3,
        3., 3., 3., 0.4,
        0., 0., 0., 0.5,
    ];
    assert_row_eq(&image, 0, &expected);
}

#[test]
fn max_change_threshold_keeps_edges() {
    let mut image = single_row(&[0., 0., 100., 0., 0.]);
    let mut kernel = box_kernel(1);
    kernel.set_thresholds(0., 50.);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_row_eq(&image, 0, &[0., THIRD, 100., THIRD, 0.]);
}

#[test]
fn min_change_threshold_keeps_flat_areas() {
    let mut image = single_row(&[0., 0., 100., 0., 0.]);
    let mut kernel = box_kernel(1);
    kernel.set_thresholds(40., 0.);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_row_eq(&image, 0, &[0., 0., THIRD, 0., 0.]);
}

#[test]
fn narrow_image_is_not_changed() {
    let mut image = single_row(&[1., 5.]);
    let mut kernel = box_kernel(2);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_row_eq(&image, 0, &[1., 5.]);

    // Width equal to radius + 1 is enough.
    let mut image = single_row(&[0., 3., 0.]);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    assert_row_eq(&image, 0, &[1., 1., 1.]);
}

#[test]
fn only_requested_rows_are_changed() {
    let rows: [&[f32]; 4] = [&[0., 3., 0.], &[0., 3., 0.], &[0., 3., 0.], &[0., 3., 0.]];
    let mut image = image_from_rows(1, &rows);
    let mut kernel = box_kernel(1);
    ff::convolve_rows(&mut image, &mut kernel, 1, 1, Some(2)).unwrap();
    assert_row_eq(&image, 0, &[0., 3., 0.]);
    assert_row_eq(&image, 1, &[1.5, 1., 1.5]);
    assert_row_eq(&image, 2, &[1.5, 1., 1.5]);
    assert_row_eq(&image, 3, &[0., 3., 0.]);

    // All rows up to the end of image
    ff::convolve_rows(&mut image, &mut kernel, 1, 3, None).unwrap();
    assert_row_eq(&image, 3, &[1.5, 1., 1.5]);
}

#[test]
fn padding_of_rows_is_not_changed() {
    let buffer = vec![
        0., 9., 0., -1., -1., //
        0., 9., 0., -1., -1., //
        0., 9., 0.,
    ];
    let mut image = ff::FloatImage::from_vec_with_stride(3, 3, 1, 5, buffer).unwrap();
    let mut kernel = box_kernel(1);
    ff::convolve_rows(&mut image, &mut kernel, 1, 0, None).unwrap();
    for y in 0..3 {
        assert_row_eq(&image, y, &[4.5, 3., 4.5]);
    }
    let buffer = image.into_vec();
    assert_eq!(&buffer[3..5], &[-1., -1.]);
    assert_eq!(&buffer[8..10], &[-1., -1.]);
}

#[test]
fn invalid_arguments() {
    let mut image = flat_image(5, 2, 3, 1.);
    let mut kernel = box_kernel(1);

    let res = ff::convolve_rows(&mut image, &mut kernel, 4, 0, None);
    assert_eq!(
        res.unwrap_err(),
        ff::FilterError::InvalidInternalState(ff::InvalidStateReason::InvalidChannelsCount {
            active: 4,
            available: 3
        })
    );
    let res = ff::convolve_rows(&mut image, &mut kernel, 0, 0, None);
    assert!(res.is_err());

    let res = ff::convolve_rows(&mut image, &mut kernel, 3, 1, Some(2));
    assert_eq!(
        res.unwrap_err(),
        ff::FilterError::InvalidInternalState(ff::InvalidStateReason::RowsOutOfRange {
            from_row: 1,
            row_count: 2,
            height: 2
        })
    );
    let res = ff::convolve_rows(&mut image, &mut kernel, 3, 3, None);
    assert!(res.is_err());
    assert_all_components(&image, 1.);
}
