//! Image filtering building blocks used by the analysis stages.
//!
//! - Gaussian blur by aperture with reflective borders ([`gaussian`]).
//! - Median blur ([`median`], backed by `imageproc`).
//! - Contrast-limited adaptive histogram equalisation ([`clahe`]).
//! - Otsu, mean and adaptive-mean thresholding ([`threshold`]).
//! - Erosion/dilation/opening/gradient with explicit elements ([`morphology`]).
//! - Zhang–Suen skeletonisation ([`thinning`]).
//!
//! All filters take an immutable input and return a new owned buffer.

pub mod clahe;
pub mod gaussian;
pub mod median;
pub mod morphology;
pub mod thinning;
pub mod threshold;

pub use clahe::{clahe, ClaheParams};
pub use gaussian::{gaussian_blur_f32, gaussian_blur_u8, gaussian_kernel};
pub use median::median_blur;
pub use morphology::{dilate, erode, gradient, open, StructuringElement};
pub use thinning::skeletonize;
pub use threshold::{adaptive_mean_threshold, binarize_above, mean_threshold, otsu_threshold};
