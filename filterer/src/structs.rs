#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Filter {
    /// Gaussian blur approximated by three successive box blurs.
    Gaussian,
    /// Moving average with window of `2 * radius + 1` pixels.
    Box,
    /// Convolution with true Gaussian kernel.
    ConvolveGaussian,
    /// Convolution with Gaussian unsharp mask kernel
    /// (`2 * identity - gaussian`).
    UnsharpKernel,
    /// Light 3-tap sharpening controlled by the `percent` option.
    Sharpen,
}
