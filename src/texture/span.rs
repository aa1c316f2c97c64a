//! Opaque span tables
//!
//! A span is a vertical run of opaque texels in one column. Each column's
//! list is ordered top to bottom and ends with a `{0, 0}` terminator, so a
//! drawer can walk it without knowing its length:
//!
//! ```text
//! column:  . # # . . # .      (# opaque, . fully transparent)
//! spans:   {1, 2} {5, 1} {0, 0}
//! ```
//!
//! All spans of a table share one `Vec`. Masked textures are built in two
//! passes (count, then fill) so that `Vec` is allocated exactly once at its
//! final size. Unmasked textures store a single `{0, height}` list that every
//! column points at.

use crate::color::palette::TRANSPARENT_INDEX;

/// One opaque run inside a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First opaque row
    pub top_offset: u32,
    /// Number of opaque rows (0 only for the terminator)
    pub length: u32,
}

impl Span {
    /// Marks the end of a column's span list
    pub const TERMINATOR: Span = Span { top_offset: 0, length: 0 };

    pub fn new(top_offset: u32, length: u32) -> Self {
        Self { top_offset, length }
    }

    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.length == 0
    }

    /// Rows covered by this span
    #[inline]
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.top_offset..self.top_offset + self.length
    }
}

/// Whether a texel is a hole (fully transparent)
///
/// Partial alpha does not count; only texels that draw nothing at all are
/// skipped by spans.
pub trait Translucent: Copy {
    fn is_translucent(self) -> bool;
}

impl Translucent for u8 {
    #[inline]
    fn is_translucent(self) -> bool {
        self == TRANSPARENT_INDEX
    }
}

impl Translucent for u32 {
    #[inline]
    fn is_translucent(self) -> bool {
        (self & 0xff00_0000) == 0
    }
}

/// Index range of one column's list inside the shared span storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnRange {
    start: u32,
    end: u32,
}

/// Span lists for every column of one pixel representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTable {
    spans: Vec<Span>,
    columns: Vec<ColumnRange>,
}

impl SpanTable {
    /// Build spans for a column-major buffer
    ///
    /// Unmasked textures get the shared full-height list regardless of
    /// pixel contents.
    pub fn build<T: Translucent>(pixels: &[T], width: usize, height: usize, masked: bool) -> Self {
        if masked {
            Self::masked(pixels, width, height)
        } else {
            Self::solid(width, height)
        }
    }

    /// Every column is one full-height span; all columns share the same list
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            spans: vec![Span::new(0, height as u32), Span::TERMINATOR],
            columns: vec![ColumnRange { start: 0, end: 2 }; width],
        }
    }

    /// Scan every column of a column-major buffer for opaque runs
    pub fn masked<T: Translucent>(pixels: &[T], width: usize, height: usize) -> Self {
        let numspans = count_spans(pixels, width, height);

        let mut spans = Vec::with_capacity(numspans);
        let mut columns = Vec::with_capacity(width);

        for column in pixels.chunks_exact(height).take(width) {
            let start = spans.len() as u32;
            let mut run: Option<Span> = None;

            for (y, &texel) in column.iter().enumerate() {
                if texel.is_translucent() {
                    if let Some(span) = run.take() {
                        spans.push(span);
                    }
                } else {
                    match run.as_mut() {
                        Some(span) => span.length += 1,
                        None => run = Some(Span::new(y as u32, 1)),
                    }
                }
            }
            if let Some(span) = run {
                spans.push(span);
            }
            spans.push(Span::TERMINATOR);

            columns.push(ColumnRange {
                start,
                end: spans.len() as u32,
            });
        }

        debug_assert_eq!(spans.len(), numspans);
        Self { spans, columns }
    }

    /// Span list for a column, terminator included
    ///
    /// `column` must already be wrapped into `0..width`.
    #[inline]
    pub fn column(&self, column: usize) -> &[Span] {
        let range = self.columns[column];
        &self.spans[range.start as usize..range.end as usize]
    }

    /// Opaque spans for a column, terminator excluded
    #[inline]
    pub fn opaque_spans(&self, column: usize) -> &[Span] {
        let list = self.column(column);
        &list[..list.len() - 1]
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Total span records stored, terminators included
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }
}

/// Count pass: opaque runs over all columns plus one terminator per column
pub fn count_spans<T: Translucent>(pixels: &[T], width: usize, height: usize) -> usize {
    let mut numspans = width;

    for column in pixels.chunks_exact(height).take(width) {
        let mut newspan = true;
        for &texel in column {
            if texel.is_translucent() {
                newspan = true;
            } else if newspan {
                newspan = false;
                numspans += 1;
            }
        }
    }

    numspans
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    /// Build a column-major indexed buffer from per-column strings
    fn columns(cols: &[&str]) -> (Vec<u8>, usize, usize) {
        let height = cols[0].len();
        let mut pixels = Vec::new();
        for col in cols {
            assert_eq!(col.len(), height);
            pixels.extend(col.bytes().map(|b| if b == b'#' { 1u8 } else { 0 }));
        }
        (pixels, cols.len(), height)
    }

    #[test]
    fn test_translucency() {
        assert!(0u8.is_translucent());
        assert!(!1u8.is_translucent());
        assert!(0x00ff_ffffu32.is_translucent());
        assert!(!0x0100_0000u32.is_translucent());
    }

    #[test]
    fn test_solid_table_shares_one_list() {
        let table = SpanTable::solid(100, 37);
        assert_eq!(table.span_count(), 2);
        assert_eq!(table.width(), 100);
        for x in [0, 50, 99] {
            assert_eq!(table.column(x), &[Span::new(0, 37), Span::TERMINATOR]);
            assert_eq!(table.column(x).as_ptr(), table.column(0).as_ptr());
        }
    }

    #[test]
    fn test_unmasked_ignores_holes() {
        let (pixels, w, h) = columns(&["..##", "...."]);
        let table = SpanTable::build(&pixels, w, h, false);
        assert_eq!(table.column(1), &[Span::new(0, 4), Span::TERMINATOR]);
    }

    #[test]
    fn test_masked_runs() {
        let (pixels, w, h) = columns(&[".##..#.", "#######", ".......", "#.#.#.#"]);
        let table = SpanTable::masked(&pixels, w, h);

        assert_eq!(
            table.column(0),
            &[Span::new(1, 2), Span::new(5, 1), Span::TERMINATOR]
        );
        assert_eq!(table.column(1), &[Span::new(0, 7), Span::TERMINATOR]);
        // Empty column points straight at a terminator
        assert_eq!(table.column(2), &[Span::TERMINATOR]);
        assert_eq!(
            table.opaque_spans(3),
            &[Span::new(0, 1), Span::new(2, 1), Span::new(4, 1), Span::new(6, 1)]
        );
        // 2 + 1 + 0 + 4 runs, plus 4 terminators
        assert_eq!(table.span_count(), 11);
        assert_eq!(count_spans(&pixels, w, h), 11);
    }

    #[test]
    fn test_true_color_alpha_mask() {
        let pixels = [0xff00_0000u32, 0x00ff_ffff, 0x80ff_0000, 0x0100_0000];
        let table = SpanTable::masked(&pixels, 1, 4);
        assert_eq!(
            table.column(0),
            &[Span::new(0, 1), Span::new(2, 2), Span::TERMINATOR]
        );
    }

    #[test]
    fn test_all_translucent_and_all_opaque() {
        let empty = vec![0u8; 5 * 3];
        let table = SpanTable::masked(&empty, 5, 3);
        assert_eq!(table.span_count(), 5);
        assert_eq!(count_spans(&empty, 5, 3), 5);

        let full = vec![7u8; 5 * 3];
        let table = SpanTable::masked(&full, 5, 3);
        assert_eq!(table.span_count(), 10);
        assert_eq!(table.column(4), &[Span::new(0, 3), Span::TERMINATOR]);
    }

    #[test]
    fn test_random_coverage_and_exact_count() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let width = rng.gen_range(1..12);
            let height = rng.gen_range(1..40);
            let density: f64 = rng.gen_range(0.0..1.0);
            let pixels: Vec<u8> = (0..width * height)
                .map(|_| if rng.gen_bool(density) { rng.gen_range(1..=255) } else { 0 })
                .collect();

            let table = SpanTable::masked(&pixels, width, height);
            assert_eq!(table.span_count(), count_spans(&pixels, width, height));

            for x in 0..width {
                let list = table.column(x);
                assert_eq!(list.last(), Some(&Span::TERMINATOR));

                let mut covered = vec![false; height];
                let mut prev_end = None;
                for span in table.opaque_spans(x) {
                    assert!(span.length > 0);
                    // Sorted, disjoint, and separated by at least one hole
                    if let Some(end) = prev_end {
                        assert!(span.top_offset > end);
                    }
                    prev_end = Some(span.top_offset + span.length);
                    for y in span.rows() {
                        covered[y as usize] = true;
                    }
                }

                for y in 0..height {
                    let opaque = !pixels[x * height + y].is_translucent();
                    assert_eq!(covered[y], opaque, "column {} row {}", x, y);
                }
            }
        }
    }
}
