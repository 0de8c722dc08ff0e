/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Minimum ROI count to extract peak windows in parallel.
pub const PARALLEL_ROI_THRESHOLD: usize = 4;

/// Number of histogram bins for Yen and Otsu thresholding.
pub const THRESHOLD_HISTOGRAM_BINS: usize = 256;

/// Side of the square structuring element used for morphological closing.
pub const CLOSING_KERNEL_SIZE: usize = 3;

/// Side of the square window used by the optional median denoise.
pub const MEDIAN_KERNEL_SIZE: usize = 3;

/// Area floor of the simple filter policy (approximate spot diameter squared).
pub const SIMPLE_POLICY_MIN_AREA: usize = 10;

/// Default minimum component area for the shape-aware policy.
pub const DEFAULT_MIN_AREA: usize = 10;

/// Default eccentricity floor for the shape-aware policy.
pub const DEFAULT_MIN_ECCENTRICITY: f64 = 0.0;

/// Default number of frames a 3D component must span to survive.
pub const DEFAULT_MIN_TIME_FRAMES: usize = 3;

/// Micrometres per centimetre, for TIFF resolution tags in centimetres.
pub const MICRONS_PER_CENTIMETER: f64 = 1.0e4;

/// Micrometres per inch, for TIFF resolution tags in inches.
pub const MICRONS_PER_INCH: f64 = 25_400.0;

/// Default nuclei diameter in physical units (micrometres).
pub const DEFAULT_NUCLEI_DIAMETER: f64 = 20.0;

/// Default half-width of the peak window, in frames. A 20-frame
/// window split symmetrically around the brightest frame.
pub const DEFAULT_HALF_WINDOW_FRAMES: usize = 10;

/// Default mitotic stages offered for annotation.
pub const DEFAULT_STAGES: [&str; 4] = ["Prophase", "Metaphase", "Anaphase", "Telophase"];

/// Name of the per-image results table written by the exporter.
pub const RESULTS_FILE_NAME: &str = "Results.csv";

/// Name of the run settings file written next to the results table.
pub const SETTINGS_FILE_NAME: &str = "Settings.toml";

/// Fixed leading columns of the results table.
pub const RESULT_COLUMNS: [&str; 7] = ["Cell", "x0", "y0", "x1", "y1", "t0", "t1"];

/// Textual marker for a stage that does not apply to a cell.
pub const NOT_APPLICABLE: &str = "NaN";
