//! The sliding I/Q sample buffer: ingestion of interleaved signed
//! bytes, in-place frequency correction, and the post-pass
//! compaction the scanner FSM performs between work() calls.

use std::f32::consts::PI;

/// Total capacity of the buffer, in complex samples. Sized to hold
/// two 10ms LTE frames at the 30.72 Msps reference rate plus slack —
/// the largest `num_samps_needed` any scanner state asks for.
pub const SAMP_BUF_SIZE: usize = 3_072_000;

/// One subframe (1ms) at the reference sample rate.
pub const ONE_SUBFRAME_NUM_SAMPS: usize = 30_720;

/// One 10ms radio frame.
pub const ONE_FRAME_NUM_SAMPS: usize = 10 * ONE_SUBFRAME_NUM_SAMPS;

/// Samples of correlation context kept across a compaction pass for
/// the next coarse timing search.
pub const LOOKBACK_SAMPS: usize = 100;

/// Seconds per sample tick at the reference rate (`0.0005 / 15360`),
/// the constant the frequency shifter's phase ramp is built from.
const TS: f32 = 0.0005 / 15360.0;

/// A fixed-capacity, two-plane (I, Q) sample buffer with a write
/// cursor (`w`) and a read cursor (`r`), plus the odd-sample carry
/// needed to pair an interleaved byte stream across `ingest` calls.
pub struct SampleBuffer {
    i_buf: Vec<f32>,
    q_buf: Vec<f32>,
    w: usize,
    r: usize,
    last_was_i: bool,
    held_i: f32,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            i_buf: vec![0.0; SAMP_BUF_SIZE],
            q_buf: vec![0.0; SAMP_BUF_SIZE],
            w: 0,
            r: 0,
            last_was_i: false,
            held_i: 0.0,
        }
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn set_r(&mut self, r: usize) {
        self.r = r;
    }

    /// Whether enough headroom remains to ingest `n_input_items` more
    /// interleaved bytes without overflowing the buffer, mirroring
    /// the reference gate `w < SIZE - (n+1)/2`.
    pub fn has_room_for(&self, n_input_items: usize) -> bool {
        self.w < SAMP_BUF_SIZE - (n_input_items + 1) / 2
    }

    /// Pair up interleaved signed-byte I/Q samples and append them at
    /// the write cursor. An odd sample count carries its last byte
    /// over as a held I sample for the next call, matching
    /// `copy_input_to_samp_buf`'s cross-call pairing.
    pub fn ingest(&mut self, input: &[i8]) {
        let offset = if self.last_was_i { 1 } else { 0 };
        if self.last_was_i && !input.is_empty() {
            self.i_buf[self.w] = self.held_i;
            self.q_buf[self.w] = input[0] as f32;
            self.w += 1;
        }

        let remaining = input.len().saturating_sub(offset);
        let pairs = remaining / 2;
        for k in 0..pairs {
            let idx = offset + k * 2;
            self.i_buf[self.w] = input[idx] as f32;
            self.q_buf[self.w] = input[idx + 1] as f32;
            self.w += 1;
        }

        if remaining % 2 != 0 {
            self.held_i = input[input.len() - 1] as f32;
            self.last_was_i = true;
        } else {
            self.last_was_i = false;
        }
    }

    /// Rotate the `[start, start + count)` window by `freq_offset_hz`
    /// Hz: applying `offset` and then `-offset` is an exact inverse
    /// (floating-point rounding aside), which is how the scanner
    /// undoes its own correction before compacting the buffer.
    pub fn freq_shift(&mut self, start: usize, count: usize, freq_offset_hz: f32) {
        for i in start..start + count {
            let phase = (i as f32 + 1.0) * (-freq_offset_hz) * 2.0 * PI * TS;
            let (sin, cos) = phase.sin_cos();
            let tmp_i = self.i_buf[i];
            let tmp_q = self.q_buf[i];
            self.i_buf[i] = tmp_i * cos + tmp_q * sin;
            self.q_buf[i] = tmp_q * cos - tmp_i * sin;
        }
    }

    /// Compact the buffer after a work() pass: drop everything before
    /// `r - LOOKBACK_SAMPS`, undo the active frequency correction
    /// across the retained span, and reset `w`/`r` accordingly.
    /// Returns the number of samples retained.
    pub fn compact(&mut self, active_freq_offset_hz: f32) -> usize {
        let new_r = self.r.saturating_sub(LOOKBACK_SAMPS);
        let samps_to_copy = self.w - new_r;
        self.freq_shift(new_r, samps_to_copy, -active_freq_offset_hz);
        self.i_buf.copy_within(new_r..new_r + samps_to_copy, 0);
        self.q_buf.copy_within(new_r..new_r + samps_to_copy, 0);
        self.w = samps_to_copy;
        self.r = LOOKBACK_SAMPS.min(samps_to_copy);
        samps_to_copy
    }

    pub fn i_plane(&self) -> &[f32] {
        &self.i_buf[..self.w]
    }

    pub fn q_plane(&self) -> &[f32] {
        &self.q_buf[..self.w]
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_pairs_even_count() {
        let mut buf = SampleBuffer::new();
        buf.ingest(&[1, 2, 3, 4]);
        assert_eq!(buf.w(), 2);
        assert_eq!(buf.i_plane(), &[1.0, 3.0]);
        assert_eq!(buf.q_plane(), &[2.0, 4.0]);
    }

    #[test]
    fn test_ingest_carries_odd_sample_across_calls() {
        let mut buf = SampleBuffer::new();
        buf.ingest(&[1, 2, 3]); // odd: pairs (1,2), holds 3 as I.
        assert_eq!(buf.w(), 1);
        buf.ingest(&[4, 5, 6]); // (3,4) then (5,6).
        assert_eq!(buf.w(), 3);
        assert_eq!(buf.i_plane(), &[1.0, 3.0, 5.0]);
        assert_eq!(buf.q_plane(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_freq_shift_is_self_inverse() {
        let mut buf = SampleBuffer::new();
        buf.ingest(&[10, -20, 30, -40, 50, -60]);
        let before_i: Vec<f32> = buf.i_plane().to_vec();
        let before_q: Vec<f32> = buf.q_plane().to_vec();

        buf.freq_shift(0, 3, 1000.0);
        buf.freq_shift(0, 3, -1000.0);

        for (a, b) in buf.i_plane().iter().zip(before_i.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
        for (a, b) in buf.q_plane().iter().zip(before_q.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_has_room_for_gate() {
        let buf = SampleBuffer::new();
        assert!(buf.has_room_for(1000));
    }
}
