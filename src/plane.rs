
use std::num::NonZeroUsize;

use crate::{
    error::{MotionError, Result},
    util::{Pixel, bitblt},
};

fn check_layout(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(NonZeroUsize, NonZeroUsize, NonZeroUsize)> {
    let (Some(width), Some(height)) = (NonZeroUsize::new(width), NonZeroUsize::new(height)) else {
        return Err(MotionError::InvalidConfiguration(format!(
            "plane dimensions must be positive, got {width}x{height}"
        )));
    };
    if stride < width.get() {
        return Err(MotionError::InvalidConfiguration(format!(
            "stride {stride} is smaller than width {width}"
        )));
    }
    // SAFETY: stride is at least width, which is non-zero
    let stride = unsafe { NonZeroUsize::new_unchecked(stride) };
    let Some(needed) = stride
        .get()
        .checked_mul(height.get() - 1)
        .and_then(|rows| rows.checked_add(width.get()))
    else {
        return Err(MotionError::InvalidConfiguration(format!(
            "a {width}x{height} plane with stride {stride} does not fit in memory"
        )));
    };
    if len < needed {
        return Err(MotionError::InvalidConfiguration(format!(
            "buffer of {len} samples is too small for a {width}x{height} plane with stride \
             {stride}, need {needed}"
        )));
    }
    Ok((width, height, stride))
}

fn contains(
    plane_width: NonZeroUsize,
    plane_height: NonZeroUsize,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<()> {
    let fits = width > 0
        && height > 0
        && x.checked_add(width).is_some_and(|right| right <= plane_width.get())
        && y.checked_add(height).is_some_and(|bottom| bottom <= plane_height.get());
    if fits {
        Ok(())
    } else {
        Err(MotionError::OutOfBounds {
            x,
            y,
            width,
            height,
            plane_width: plane_width.get(),
            plane_height: plane_height.get(),
        })
    }
}

/// A single plane of samples borrowed from the caller.
///
/// The plane never copies or mutates the buffer. Every view handed out
/// borrows the same buffer, so none of them can outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a, T: Pixel> {
    data: &'a [T],
    width: NonZeroUsize,
    height: NonZeroUsize,
    stride: NonZeroUsize,
}

impl<'a, T: Pixel> Plane<'a, T> {
    /// Wraps `data` as a `width` x `height` plane whose rows start every
    /// `stride` samples.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> Result<Self> {
        let (width, height, stride) = check_layout(data.len(), width, height, stride)?;
        Ok(Plane {
            data,
            width,
            height,
            stride,
        })
    }

    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    #[must_use]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[must_use]
    pub fn same_dimensions<U: Pixel>(&self, other: &Plane<'_, U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Returns a view of the `w` x `h` rectangle whose top-left sample is at
    /// `(x, y)`.
    pub fn view(&self, x: usize, y: usize, w: usize, h: usize) -> Result<BlockView<'a, T>> {
        contains(self.width, self.height, x, y, w, h)?;
        // SAFETY: `contains` rejects zero sizes
        let (width, height) =
            unsafe { (NonZeroUsize::new_unchecked(w), NonZeroUsize::new_unchecked(h)) };
        let offset = y * self.stride.get() + x;
        let len = self.stride.get() * (h - 1) + w;
        Ok(BlockView {
            data: &self.data[offset..offset + len],
            width,
            height,
            stride: self.stride,
        })
    }

    #[must_use]
    pub fn full_view(&self) -> BlockView<'a, T> {
        let len = self.stride.get() * (self.height.get() - 1) + self.width.get();
        BlockView {
            data: &self.data[..len],
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    pub fn sample(&self, x: usize, y: usize) -> Result<T> {
        contains(self.width, self.height, x, y, 1, 1)?;
        Ok(self.data[y * self.stride.get() + x])
    }

    /// Copies the visible samples into a tightly packed owned plane.
    #[must_use]
    pub fn to_plane_buf(&self) -> PlaneBuf<T> {
        let mut data = vec![T::default(); self.width.get() * self.height.get()];
        bitblt(
            &mut data,
            self.width,
            self.data,
            self.stride,
            self.width,
            self.height,
        );
        PlaneBuf {
            data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// A rectangular window into a plane. Holds no samples of its own.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a, T: Pixel> {
    data: &'a [T],
    width: NonZeroUsize,
    height: NonZeroUsize,
    stride: NonZeroUsize,
}

impl<'a, T: Pixel> BlockView<'a, T> {
    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// The backing samples, starting at the top-left of the view and ending
    /// at its bottom-right sample.
    #[must_use]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[must_use]
    pub fn same_shape<U: Pixel>(&self, other: &BlockView<'_, U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn sample(&self, x: usize, y: usize) -> Result<T> {
        contains(self.width, self.height, x, y, 1, 1)?;
        Ok(self.data[y * self.stride.get() + x])
    }

    /// Row `y` of the view. Panics if `y` is not below the view height.
    #[must_use]
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height.get(), "row {y} outside of view");
        &self.data[y * self.stride.get()..][..self.width.get()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + use<'a, T> {
        let data = self.data;
        let width = self.width.get();
        let stride = self.stride.get();
        (0..self.height.get()).map(move |y| &data[y * stride..][..width])
    }

    /// Narrows the view to a rectangle relative to its own top-left corner.
    pub fn sub_view(&self, x: usize, y: usize, w: usize, h: usize) -> Result<BlockView<'a, T>> {
        contains(self.width, self.height, x, y, w, h)?;
        // SAFETY: `contains` rejects zero sizes
        let (width, height) =
            unsafe { (NonZeroUsize::new_unchecked(w), NonZeroUsize::new_unchecked(h)) };
        let offset = y * self.stride.get() + x;
        let len = self.stride.get() * (h - 1) + w;
        Ok(BlockView {
            data: &self.data[offset..offset + len],
            width,
            height,
            stride: self.stride,
        })
    }
}

/// A plane that owns its samples. Used for interpolated reference planes and
/// motion compensated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneBuf<T: Pixel> {
    data: Vec<T>,
    width: NonZeroUsize,
    height: NonZeroUsize,
    stride: NonZeroUsize,
}

impl<T: Pixel> PlaneBuf<T> {
    /// A zero filled, tightly packed plane.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = width.checked_mul(height).ok_or_else(|| {
            MotionError::InvalidConfiguration(format!("plane {width}x{height} is too large"))
        })?;
        Self::from_vec(vec![T::default(); len], width, height, width)
    }

    pub fn from_vec(data: Vec<T>, width: usize, height: usize, stride: usize) -> Result<Self> {
        let (width, height, stride) = check_layout(data.len(), width, height, stride)?;
        Ok(PlaneBuf {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wraps a buffer that already holds exactly `width * height` samples.
    pub(crate) fn from_packed(data: Vec<T>, width: NonZeroUsize, height: NonZeroUsize) -> Self {
        debug_assert_eq!(data.len(), width.get() * height.get());
        PlaneBuf {
            data,
            width,
            height,
            stride: width,
        }
    }

    #[must_use]
    pub fn as_plane(&self) -> Plane<'_, T> {
        Plane {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn view(&self, x: usize, y: usize, w: usize, h: usize) -> Result<BlockView<'_, T>> {
        self.as_plane().view(x, y, w, h)
    }

    pub fn sample(&self, x: usize, y: usize) -> Result<T> {
        self.as_plane().sample(x, y)
    }

    pub fn sample_mut(&mut self, x: usize, y: usize) -> Result<&mut T> {
        contains(self.width, self.height, x, y, 1, 1)?;
        Ok(&mut self.data[y * self.stride.get() + x])
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        *self.sample_mut(x, y)? = value;
        Ok(())
    }

    /// Copies `block` into this plane with its top-left sample at `(x, y)`.
    pub fn write_block(&mut self, x: usize, y: usize, block: &BlockView<'_, T>) -> Result<()> {
        contains(
            self.width,
            self.height,
            x,
            y,
            block.width().get(),
            block.height().get(),
        )?;
        let offset = y * self.stride.get() + x;
        bitblt(
            &mut self.data[offset..],
            self.stride,
            block.data(),
            block.stride(),
            block.width(),
            block.height(),
        );
        Ok(())
    }
}
