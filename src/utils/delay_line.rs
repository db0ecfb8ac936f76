//! Delay line.
//!
//! Circular buffer over any `f32` storage: an inline array for short lines that live inside
//! their owner, or a slice obtained from [`crate::memory::allocate_buffer`] for long ones.
//! A delay of `1` reads the most recently written sample.

#[derive(Debug)]
pub struct DelayLine<B> {
    write_ptr: usize,
    line: B,
}

/// Delay line with a compile-time capacity stored inline.
pub type FixedDelayLine<const MAX_DELAY: usize> = DelayLine<[f32; MAX_DELAY]>;

impl<const MAX_DELAY: usize> Default for DelayLine<[f32; MAX_DELAY]> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_DELAY: usize> DelayLine<[f32; MAX_DELAY]> {
    pub fn new() -> Self {
        Self {
            write_ptr: 0,
            line: [0.0; MAX_DELAY],
        }
    }
}

impl<'a> DelayLine<&'a mut [f32]> {
    /// Build a delay line on externally provided memory. The capacity is the buffer length.
    pub fn from_buffer(buffer: &'a mut [f32]) -> Self {
        Self {
            write_ptr: 0,
            line: buffer,
        }
    }
}

impl<B> DelayLine<B>
where
    B: AsRef<[f32]> + AsMut<[f32]>,
{
    pub fn init(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        self.line.as_mut().fill(0.0);
        self.write_ptr = 0;
    }

    /// Number of samples the line can hold.
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.line.as_ref().len()
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        let size = self.max_delay();
        self.line.as_mut()[self.write_ptr] = sample;
        self.write_ptr = (self.write_ptr + size - 1) % size;
    }

    #[inline]
    pub fn allpass(&mut self, sample: f32, delay: usize, coefficient: f32) -> f32 {
        let read = self.read(delay);
        let write = sample + coefficient * read;
        self.write(write);

        -write * coefficient + read
    }

    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let line = self.line.as_ref();
        line[(self.write_ptr + delay) % line.len()]
    }

    /// Read with linear interpolation between neighbouring samples.
    #[inline]
    pub fn read_frac(&self, delay: f32) -> f32 {
        let line = self.line.as_ref();
        let size = line.len();
        let delay_integral = delay as usize;
        let delay_fractional = delay - (delay_integral as f32);
        let a = line[(self.write_ptr + delay_integral) % size];
        let b = line[(self.write_ptr + delay_integral + 1) % size];

        a + (b - a) * delay_fractional
    }

    #[inline]
    pub fn read_hermite(&self, delay: f32) -> f32 {
        let line = self.line.as_ref();
        let size = line.len();
        let delay_integral = delay as usize;
        let delay_fractional = delay - (delay_integral as f32);
        let t = self.write_ptr + delay_integral + size;
        let xm1 = line[(t - 1) % size];
        let x0 = line[t % size];
        let x1 = line[(t + 1) % size];
        let x2 = line[(t + 2) % size];
        let c = (x1 - xm1) * 0.5;
        let v = x0 - x1;
        let w = c + v;
        let a = w + v + (x2 - x0) * 0.5;
        let b_neg = w + a;
        let f = delay_fractional;

        (((a * f) - b_neg) * f + c) * f + x0
    }
}
