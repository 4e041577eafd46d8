//! Fixed 3×3 gradient kernels, indexed `[dy + 1][dx + 1]`.

pub type Kernel = [[i32; 3]; 3];

pub const SOBEL_X: Kernel = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
pub const SOBEL_Y: Kernel = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

pub const PREWITT_X: Kernel = [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]];
pub const PREWITT_Y: Kernel = [[-1, -1, -1], [0, 0, 0], [1, 1, 1]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeFilter {
    Sobel,
    Prewitt,
}

impl EdgeFilter {
    pub const ALL: [EdgeFilter; 2] = [EdgeFilter::Sobel, EdgeFilter::Prewitt];

    /// Horizontal and vertical kernels, in that order.
    pub fn kernels(self) -> (&'static Kernel, &'static Kernel) {
        match self {
            EdgeFilter::Sobel => (&SOBEL_X, &SOBEL_Y),
            EdgeFilter::Prewitt => (&PREWITT_X, &PREWITT_Y),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeFilter::Sobel => "sobel",
            EdgeFilter::Prewitt => "prewitt",
        }
    }
}

impl std::fmt::Display for EdgeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
