use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fast_image_filters as ff;
use fast_image_filters::{ConvolutionKernel, FloatImage};
use image::{ColorType, DynamicImage, ImageReader};
use log::debug;

mod structs;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Path to source image file
    #[clap(value_parser)]
    source_path: PathBuf,

    /// Path to result image file
    #[clap(value_parser)]
    destination_path: Option<PathBuf>,

    /// Overwrite destination file
    #[clap(short, long, action)]
    overwrite: bool,

    /// Filter applied to the source image
    #[clap(short, long, value_enum, default_value_t = structs::Filter::Gaussian)]
    filter: structs::Filter,

    /// Standard deviation of Gaussian filters
    #[clap(short, long, value_parser, default_value_t = 1.0)]
    sigma: f32,

    /// Radius of kernel, by default it is `ceil(3 * sigma)`
    #[clap(short, long, value_parser)]
    radius: Option<u32>,

    /// Count of passes of the "box" filter
    #[clap(long, value_parser, default_value_t = 1)]
    passes: u32,

    /// Strength of the "sharpen" filter, in range 0.0..1.0
    #[clap(short, long, value_parser, default_value_t = 0.2)]
    percent: f64,

    /// Keep the original pixel if the sum of changes of its channels is less than this value
    #[clap(long, value_parser, default_value_t = 0.0)]
    threshold_min: f32,

    /// Keep the original pixel if the sum of changes of its channels is greater than this value
    #[clap(long, value_parser, default_value_t = 0.0)]
    threshold_max: f32,

    /// Filter rows only, without the vertical pass
    #[clap(long, action)]
    horizontal_only: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    filter(&cli)
}

fn filter(cli: &Cli) -> Result<()> {
    let (mut image, color_type) = open_source_image(cli)?;

    debug!("Apply {:?} filter to rows of the image", cli.filter);
    apply_filter(cli, &mut image).with_context(|| "Failed to filter rows of image")?;

    if !cli.horizontal_only {
        debug!("Apply {:?} filter to columns of the image", cli.filter);
        let mut transposed = image.transposed();
        apply_filter(cli, &mut transposed).with_context(|| "Failed to filter columns of image")?;
        image = transposed.transposed();
    }

    save_result(cli, &image, color_type)
}

fn open_source_image(cli: &Cli) -> Result<(FloatImage<'static>, ColorType)> {
    let source_path = &cli.source_path;
    debug!("Opening the source image {:?}", source_path);
    let image = ImageReader::open(source_path)
        .with_context(|| format!("Failed to read source file from {:?}", source_path))?
        .decode()
        .with_context(|| "Failed to decode source image")?;
    let color_type = image.color();
    let float_image = FloatImage::from_dynamic_image(&image)
        .with_context(|| "Failed to create float pixels container")?;
    Ok((float_image, color_type))
}

fn kernel_radius(cli: &Cli) -> u32 {
    cli.radius
        .unwrap_or_else(|| (3. * cli.sigma.max(0.)).ceil() as u32)
}

fn apply_filter(cli: &Cli, image: &mut FloatImage) -> Result<()> {
    let channels = image.channels();
    match cli.filter {
        structs::Filter::Gaussian => {
            let diameter = ff::box_blur_diameter(cli.sigma, image.width());
            let mut kernel = ConvolutionKernel::new((diameter + 1) / 2)?;
            ff::par_approx_gaussian_blur(image, cli.sigma, &mut kernel)?;
        }
        structs::Filter::Box => {
            let radius = kernel_radius(cli);
            let mut kernel = ConvolutionKernel::new(radius)?;
            ff::par_boxblur(image, radius, cli.passes, channels, &mut kernel)?;
        }
        structs::Filter::ConvolveGaussian => {
            let mut kernel =
                ConvolutionKernel::gaussian_normalized(cli.sigma as f64, kernel_radius(cli))?;
            kernel.set_thresholds(cli.threshold_min, cli.threshold_max);
            ff::par_convolve(image, &mut kernel, channels)?;
        }
        structs::Filter::UnsharpKernel => {
            let mut kernel =
                ConvolutionKernel::gaussian_sharpen(cli.sigma as f64, kernel_radius(cli))?;
            kernel.set_thresholds(cli.threshold_min, cli.threshold_max);
            ff::par_convolve(image, &mut kernel, channels)?;
        }
        structs::Filter::Sharpen => {
            ff::par_sharpen(image, cli.percent)?;
        }
    }
    Ok(())
}

fn save_result(cli: &Cli, image: &FloatImage, color_type: ColorType) -> Result<()> {
    let result_path = if let Some(path) = cli.destination_path.clone() {
        path
    } else {
        let mut path = PathBuf::from("./");
        let ext = cli
            .source_path
            .extension()
            .unwrap_or_else(|| OsStr::new("png"));
        path.push("result");
        path.set_extension(ext);
        path
    };
    if result_path.exists() && !cli.overwrite {
        return Err(anyhow!(
            "Destination path {:?} already exists.",
            result_path
        ));
    };

    let result = image
        .to_dynamic_image()
        .with_context(|| "Failed to create result image")?;
    let result = into_color_type(result, color_type);

    debug!("Save the result image into the file {:?}", result_path);
    result
        .save(&result_path)
        .with_context(|| "Failed to save the result image")?;
    Ok(())
}

/// Converts float pixels back into the pixel format of the source image.
fn into_color_type(image: DynamicImage, color_type: ColorType) -> DynamicImage {
    match color_type {
        ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
        ColorType::Rgb32F | ColorType::Rgba32F => image,
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}
