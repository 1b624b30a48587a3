//! Frame assembly: a fixed-length delay line with a free-running period counter.

/// Delay line of `fft_size + 1` samples that fires once every `period` pushes.
///
/// The line starts zero-filled; frames completed before it has been filled
/// see that zero fill as leading silence.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    line: Vec<f64>,
    write_pos: usize,
    counter: usize,
    period: usize,
}

impl FrameAssembler {
    /// `fft_size` is the analysis window length; `period` is in samples (>= 1).
    pub fn new(fft_size: usize, period: usize) -> Self {
        Self {
            line: vec![0.0; fft_size + 1],
            write_pos: 0,
            counter: 0,
            period: period.max(1),
        }
    }

    /// Append one sample, discarding the oldest. Returns `true` exactly once
    /// every `period` calls.
    #[inline]
    pub fn push(&mut self, sample: f64) -> bool {
        self.line[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.line.len();

        self.counter += 1;
        if self.counter >= self.period {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Copy the delay line, oldest sample first, into `dst` (`len() + 1` samples).
    #[inline]
    pub fn copy_into(&self, dst: &mut [f64]) {
        let (newer, older) = self.line.split_at(self.write_pos);
        dst[..older.len()].copy_from_slice(older);
        dst[older.len()..self.line.len()].copy_from_slice(newer);
    }

    /// Window length handed to the analyzers (`fft_size`).
    pub fn len(&self) -> usize {
        self.line.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn reset(&mut self) {
        self.line.fill(0.0);
        self.write_pos = 0;
        self.counter = 0;
    }
}

/// The two aligned analysis windows of one completed frame.
///
/// `current` drops the oldest sample of the delay line, `delayed` drops the
/// newest, so `delayed[i + 1] == current[i]` for every shared index.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisFrame<'a> {
    pub current: &'a [f64],
    pub delayed: &'a [f64],
}

impl<'a> AnalysisFrame<'a> {
    /// Split a linearized delay line (oldest first) into the two windows.
    #[inline]
    pub fn from_line(line: &'a [f64]) -> Self {
        let last = line.len() - 1;
        Self {
            current: &line[1..],
            delayed: &line[..last],
        }
    }
}
