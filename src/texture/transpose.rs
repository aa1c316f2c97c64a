//! Row-major <-> column-major conversion
//!
//! Row-major pixel `(x, y)` lives at `x + y * width`; the column-major copy
//! keeps it at `y + x * height`, so every column is one contiguous run.

/// Transpose a row-major buffer into column-major order, mapping each pixel
///
/// `src` must hold at least `width * height` pixels.
pub fn transpose_map<S, D, F>(src: &[S], width: usize, height: usize, mut map: F) -> Vec<D>
where
    S: Copy,
    D: Copy + Default,
    F: FnMut(S) -> D,
{
    let mut dest = vec![D::default(); width * height];
    transpose_map_into(src, &mut dest, width, height, &mut map);
    dest
}

/// Transpose into an existing column-major slice (at least `width * height` long)
pub fn transpose_map_into<S, D, F>(src: &[S], dest: &mut [D], width: usize, height: usize, mut map: F)
where
    S: Copy,
    F: FnMut(S) -> D,
{
    for (x, column) in dest.chunks_exact_mut(height).take(width).enumerate() {
        for (y, texel) in column.iter_mut().enumerate() {
            *texel = map(src[x + y * width]);
        }
    }
}

/// Transpose a row-major buffer into column-major order unchanged
pub fn transpose<T: Copy + Default>(src: &[T], width: usize, height: usize) -> Vec<T> {
    transpose_map(src, width, height, |p| p)
}

/// Inverse of [`transpose`]: column-major back to row-major
pub fn untranspose<T: Copy + Default>(src: &[T], width: usize, height: usize) -> Vec<T> {
    let mut dest = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            dest[x + y * width] = src[y + x * height];
        }
    }
    dest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_index_formula() {
        // 3x2 row-major:
        //   0 1 2
        //   3 4 5
        let src = [0u8, 1, 2, 3, 4, 5];
        let cols = transpose(&src, 3, 2);
        assert_eq!(cols, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_round_trip_is_lossless() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (5, 3), (16, 9), (17, 5)] {
            let src: Vec<u32> = (0..(w * h) as u32).map(|i| i.wrapping_mul(2654435761)).collect();
            let cols = transpose(&src, w, h);
            assert_eq!(untranspose(&cols, w, h), src, "{}x{}", w, h);
            // Repeating the round trip changes nothing
            let again = untranspose(&transpose(&untranspose(&cols, w, h), w, h), w, h);
            assert_eq!(again, src);
        }
    }

    #[test]
    fn test_transpose_map_converts_type() {
        let src = [0x0000_0010u32, 0x0000_0020, 0x0000_0030, 0x0000_0040];
        let cols: Vec<u8> = transpose_map(&src, 2, 2, |c| c as u8);
        assert_eq!(cols, vec![0x10, 0x30, 0x20, 0x40]);
    }

    #[test]
    fn test_transpose_into_prefix_only() {
        let src = [1u32, 2, 3, 4];
        let mut dest = vec![9u32; 6];
        transpose_map_into(&src, &mut dest, 2, 2, |p| p);
        assert_eq!(dest, vec![1, 3, 2, 4, 9, 9]);
    }
}
