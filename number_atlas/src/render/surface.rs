// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable off-screen surfaces.

use core::cell::RefCell;
use core::ops::{Deref, DerefMut};

use tiny_skia::{Color, Pixmap};

use crate::error::Error;

/// Surfaces kept for reuse once returned.
const MAX_POOLED: usize = 4;

/// A pool of off-screen bitmaps.
///
/// [`acquire`](Self::acquire) hands out a [`TemporarySurface`] cleared to
/// transparent. The surface goes back to the pool when the guard is dropped,
/// whichever way the caller leaves its scope.
#[derive(Debug, Default)]
pub struct SurfacePool {
    free: RefCell<Vec<Pixmap>>,
}

impl SurfacePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows a transparent `width` x `height` surface.
    pub fn acquire(&self, width: u32, height: u32) -> Result<TemporarySurface<'_>, Error> {
        let reused = {
            let mut free = self.free.borrow_mut();
            free.iter()
                .position(|p| p.width() == width && p.height() == height)
                .map(|index| free.swap_remove(index))
        };
        let pixmap = match reused {
            Some(mut pixmap) => {
                pixmap.fill(Color::TRANSPARENT);
                pixmap
            }
            None => Pixmap::new(width, height)
                .ok_or_else(|| Error::surface_allocation(width, height))?,
        };
        Ok(TemporarySurface {
            pool: self,
            pixmap: Some(pixmap),
        })
    }

    /// Number of surfaces waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.free.borrow().len()
    }

    fn give_back(&self, pixmap: Pixmap) {
        let mut free = self.free.borrow_mut();
        if free.len() < MAX_POOLED {
            free.push(pixmap);
        }
    }
}

/// A surface borrowed from a [`SurfacePool`].
#[derive(Debug)]
pub struct TemporarySurface<'a> {
    pool: &'a SurfacePool,
    pixmap: Option<Pixmap>,
}

impl Deref for TemporarySurface<'_> {
    type Target = Pixmap;

    fn deref(&self) -> &Pixmap {
        // Only `drop` takes the pixmap out.
        self.pixmap.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for TemporarySurface<'_> {
    fn deref_mut(&mut self) -> &mut Pixmap {
        self.pixmap.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for TemporarySurface<'_> {
    fn drop(&mut self) {
        if let Some(pixmap) = self.pixmap.take() {
            self.pool.give_back(pixmap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_return_on_drop_and_come_back_cleared() {
        let pool = SurfacePool::new();
        {
            let mut surface = pool.acquire(3, 2).unwrap();
            surface.fill(Color::WHITE);
            assert_eq!(pool.pooled(), 0);
        }
        assert_eq!(pool.pooled(), 1);

        let surface = pool.acquire(3, 2).unwrap();
        assert_eq!(pool.pooled(), 0, "matching surface is reused");
        assert!(surface.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn surfaces_return_on_early_exit() {
        fn fails(pool: &SurfacePool) -> Result<(), Error> {
            let _surface = pool.acquire(2, 2)?;
            Err(Error::surface_allocation(0, 0))
        }
        let pool = SurfacePool::new();
        assert!(fails(&pool).is_err());
        assert_eq!(pool.pooled(), 1);
    }

    #[test]
    fn zero_sized_surface_is_an_error() {
        let pool = SurfacePool::new();
        assert!(pool.acquire(0, 4).is_err());
    }
}
