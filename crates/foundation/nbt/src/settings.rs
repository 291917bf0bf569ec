use flate2::Compression;


// ================================
//      Limits
// ================================

/// The recursive NBT tags (Compounds and Lists) can be nested up to (and including)
/// 512 levels deep in the standard format.
///
/// Note that this crate uses recursive functions to read, write, parse and print NBT data;
/// if the limit is too high and unreasonably nested data is received,
/// a crash could occur from the nested function calls exceeding the maximum stack size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit(pub(crate) u32);

impl Default for DepthLimit {
    /// The maximum depth that NBT compounds and lists can be nested in the standard format.
    fn default() -> Self {
        Self(512)
    }
}

impl DepthLimit {
    /// A limit on how deeply the recursive NBT tags (Compounds and Lists) may be nested.
    #[inline]
    pub const fn new(limit: u32) -> Self {
        Self(limit)
    }

    #[inline]
    pub const fn limit(self) -> u32 {
        self.0
    }
}


// ================================
//      IO Settings
// ================================

/// Options for reading/writing NBT data from/to bytes (e.g. from/to a file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoOptions {
    /// Compression of NBT bytes.
    ///
    /// Default: Gzip compression with the default compression level.
    pub compression: NbtCompression,
    /// The maximum depth that NBT compounds and lists can be recursively nested, used both
    /// when writing and for the accounter created by the reading helpers that take options.
    ///
    /// Default: 512.
    pub depth_limit: DepthLimit,
}

impl IoOptions {
    /// Gzip-compressed NBT, as used by save files.
    #[inline]
    pub fn java() -> Self {
        Self {
            compression: NbtCompression::GzipCompressed,
            depth_limit: DepthLimit::default(),
        }
    }

    /// Raw NBT bytes with no compression.
    #[inline]
    pub fn uncompressed() -> Self {
        Self {
            compression: NbtCompression::Uncompressed,
            ..Self::java()
        }
    }
}

impl Default for IoOptions {
    #[inline]
    fn default() -> Self {
        Self::java()
    }
}

/// Describes the compression options for NBT data:
/// uncompressed, Zlib-compressed and Gzip-compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtCompression {
    /// Uncompressed NBT data.
    Uncompressed,
    /// Zlib-compressed NBT data. When writing, the default compression level will be used.
    ZlibCompressed,
    /// Zlib-compressed NBT data with the given compression level.
    ZlibCompressedWith(CompressionLevel),
    /// Gzip-compressed NBT data. When writing, the default compression level will be used.
    GzipCompressed,
    /// Gzip-compressed NBT data with the given compression level.
    GzipCompressedWith(CompressionLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Levels above 9 are clamped to 9.
    #[inline]
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }
}

impl From<Compression> for CompressionLevel {
    fn from(value: Compression) -> Self {
        // Only values 0-9 are meaningful, 0-255 is more than enough.
        Self(value.level().min(9) as u8)
    }
}

impl From<CompressionLevel> for Compression {
    fn from(value: CompressionLevel) -> Self {
        Self::new(u32::from(value.0))
    }
}


// ================================
//      SNBT Options
// ================================

/// Options for parsing SNBT data into NBT data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnbtParseOptions {
    /// The maximum depth that NBT compounds and lists can be recursively nested.
    ///
    /// Default: 512.
    pub depth_limit: DepthLimit,
    /// Whether float literals that overflow to an infinity (e.g. `1e1000`) should be replaced
    /// with the `MAX` or `MIN` constant of `f32` or `f64` instead of being rejected.
    ///
    /// Default: `false`
    pub replace_non_finite: bool,
}

impl Default for SnbtParseOptions {
    #[inline]
    fn default() -> Self {
        Self {
            depth_limit:        DepthLimit::default(),
            replace_non_finite: false,
        }
    }
}

/// Options for writing NBT data to compact SNBT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnbtWriteOptions {
    /// The maximum depth that NBT compounds and lists can be recursively nested.
    ///
    /// Default: 512.
    pub depth_limit: DepthLimit,
    /// How to print an infinite or NaN float/double tag.
    ///
    /// Default: `PrintFloats`
    pub non_finite: WriteNonFinite,
}

impl Default for SnbtWriteOptions {
    #[inline]
    fn default() -> Self {
        Self {
            depth_limit: DepthLimit::default(),
            non_finite:  WriteNonFinite::PrintFloats,
        }
    }
}

/// NBT and SNBT aren't meant to hold infinite and NaN float or double values, but they
/// could be encountered anyway. This enum indicates whether such a value should be displayed
/// as the `MAX` constant of `f32` or `f64` for positive infinity, the `MIN` constant for
/// negative infinity and `0` for NaN, or as `Infinityd`, `-Infinityf`, `NaNd` and similar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteNonFinite {
    /// Display positive infinity as though it were the `MAX` constant of `f32` or `f64`,
    /// negative infinity as the `MIN` constant, and NaN as `0`. The output stays parsable.
    PrintFloats,
    /// Display positive infinity as `Infinityd` or `Infinityf`, negative infinity
    /// as `-Infinityd` or `-Infinityf`, and an NaN value as `NaNf` or  `NaNd`.
    /// The grammar does not read these back as numbers.
    PrintStrings,
}

/// Options for the indented SNBT printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// The string used for one level of indentation.
    ///
    /// Default: four spaces.
    pub indent: String,
    /// Print the elements of byte, int and long arrays as unsigned hexadecimal literals
    /// (such as `0xFFub`), which parse back to the same values.
    ///
    /// Default: `false`
    pub raw_arrays: bool,
    /// Containers nested deeper than this are replaced by a placeholder string.
    ///
    /// Default: 512.
    pub depth_limit: DepthLimit,
}

impl Default for PrettyOptions {
    #[inline]
    fn default() -> Self {
        Self {
            indent:      "    ".to_owned(),
            raw_arrays:  false,
            depth_limit: DepthLimit::default(),
        }
    }
}

/// Options for the styled segment printer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledOptions {
    /// The string used for one level of indentation. If empty, the output is a single line.
    ///
    /// Default: empty.
    pub indent: String,
}
