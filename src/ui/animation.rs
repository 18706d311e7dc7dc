//! Paced typewriter rendering.
//!
//! Each glyph is first shown as a random filler character, held for the
//! garble duration, then replaced by the true glyph and held for the per-glyph
//! delay. The engine never sleeps: the owner loop asks for
//! [`AnimationEngine::next_deadline`] and calls [`AnimationEngine::tick`] when
//! it passes, so input and task completions keep flowing during a render.
//!
//! Only one job animates at a time. A render requested while another is
//! active is dropped or queued according to [`BusyPolicy`]. Plain lines
//! printed during a render are held back and written, in order, once the
//! render finishes. A job's continuation is handed back before the next
//! queued job starts, so output it produces lands between the two.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::output::OutputSink;

const FILLER: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// What to do with a render request that arrives while another is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    #[default]
    Drop,
    Queue,
}

pub struct AnimationJob<C> {
    text: String,
    per_char_delay: Duration,
    garble_duration: Duration,
    continuation: Option<C>,
}

impl<C> AnimationJob<C> {
    pub fn new(text: impl Into<String>, per_char_delay: Duration, garble_duration: Duration) -> Self {
        Self {
            text: text.into(),
            per_char_delay,
            garble_duration,
            continuation: None,
        }
    }

    /// Value handed back from [`AnimationEngine::tick`] once the job finishes.
    pub fn then(mut self, continuation: C) -> Self {
        self.continuation = Some(continuation);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Started,
    Queued,
    Dropped,
}

enum Pending<C> {
    Job(AnimationJob<C>),
    Line(String),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Garble,
    Reveal { garbled: bool },
    EndOfLine,
}

struct ActiveJob<C> {
    lines: Vec<Vec<String>>,
    line: usize,
    glyph: usize,
    phase: Phase,
    deadline: Instant,
    per_char_delay: Duration,
    garble_duration: Duration,
    continuation: Option<C>,
}

impl<C> ActiveJob<C> {
    fn start(job: AnimationJob<C>, now: Instant) -> Self {
        let lines = if job.text.is_empty() {
            vec![Vec::new()]
        } else {
            job.text
                .lines()
                .map(|line| line.graphemes(true).map(str::to_owned).collect())
                .collect()
        };
        let mut active = Self {
            lines,
            line: 0,
            glyph: 0,
            phase: Phase::EndOfLine,
            deadline: now,
            per_char_delay: job.per_char_delay,
            garble_duration: job.garble_duration,
            continuation: job.continuation,
        };
        active.phase = active.glyph_phase();
        active
    }

    fn glyph_phase(&self) -> Phase {
        if self.glyph >= self.lines[self.line].len() {
            Phase::EndOfLine
        } else if self.garble_duration.is_zero() {
            Phase::Reveal { garbled: false }
        } else {
            Phase::Garble
        }
    }

    /// Performs one step; returns `true` after the final line terminator.
    fn step(
        &mut self,
        now: Instant,
        sink: &mut dyn OutputSink,
        rng: &mut StdRng,
    ) -> io::Result<bool> {
        match self.phase {
            Phase::Garble => {
                let filler = FILLER[rng.gen_range(0..FILLER.len())] as char;
                sink.write_text(filler.encode_utf8(&mut [0; 4]))?;
                self.phase = Phase::Reveal { garbled: true };
                self.deadline = now + self.garble_duration;
            }
            Phase::Reveal { garbled } => {
                let glyph = &self.lines[self.line][self.glyph];
                if garbled {
                    sink.overwrite_last(glyph)?;
                } else {
                    sink.write_text(glyph)?;
                }
                self.glyph += 1;
                self.phase = self.glyph_phase();
                self.deadline = now + self.per_char_delay;
            }
            Phase::EndOfLine => {
                sink.newline()?;
                self.line += 1;
                self.deadline = now + self.per_char_delay;
                if self.line == self.lines.len() {
                    return Ok(true);
                }
                self.glyph = 0;
                self.phase = self.glyph_phase();
            }
        }
        Ok(false)
    }

    fn write_remaining(&mut self, sink: &mut dyn OutputSink) -> io::Result<()> {
        if let Phase::Reveal { garbled: true } = self.phase {
            sink.overwrite_last(&self.lines[self.line][self.glyph])?;
            self.glyph += 1;
        }
        while self.line < self.lines.len() {
            let rest = self.lines[self.line][self.glyph..].concat();
            sink.write_text(&rest)?;
            sink.newline()?;
            self.line += 1;
            self.glyph = 0;
        }
        Ok(())
    }
}

pub struct AnimationEngine<C> {
    policy: BusyPolicy,
    active: Option<ActiveJob<C>>,
    pending: VecDeque<Pending<C>>,
    /// Set when a queued job is waiting on a continuation handed back.
    resume_at: Option<Instant>,
    rng: StdRng,
    dropped: u64,
}

impl<C> AnimationEngine<C> {
    pub fn new(policy: BusyPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    pub fn with_seed(policy: BusyPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: BusyPolicy, rng: StdRng) -> Self {
        Self {
            policy,
            active: None,
            pending: VecDeque::new(),
            resume_at: None,
            rng,
            dropped: 0,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some() || !self.pending.is_empty()
    }

    /// Number of render requests discarded under [`BusyPolicy::Drop`].
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.active
            .as_ref()
            .map(|job| job.deadline)
            .or(self.resume_at)
    }

    /// Starts `job` if idle. Nothing is written until the next [`tick`](Self::tick).
    pub fn render(&mut self, job: AnimationJob<C>, now: Instant) -> RenderOutcome {
        if self.active.is_none() && self.pending.is_empty() {
            self.active = Some(ActiveJob::start(job, now));
            return RenderOutcome::Started;
        }
        match self.policy {
            BusyPolicy::Drop => {
                self.dropped += 1;
                debug!(dropped = self.dropped, "render request dropped while animating");
                RenderOutcome::Dropped
            }
            BusyPolicy::Queue => {
                self.pending.push_back(Pending::Job(job));
                RenderOutcome::Queued
            }
        }
    }

    /// Writes `text` immediately when idle, otherwise after the active render.
    pub fn print(&mut self, text: &str, sink: &mut dyn OutputSink) -> io::Result<()> {
        if self.active.is_some() {
            self.pending
                .extend(split_lines(text).map(|line| Pending::Line(line.to_owned())));
            return Ok(());
        }
        for line in split_lines(text) {
            write_line(line, sink)?;
        }
        sink.flush()
    }

    /// Performs every step due at `now` and returns the continuations of the
    /// jobs that finished. On a write error all pending output is discarded.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn OutputSink) -> io::Result<Vec<C>> {
        let result = self.advance(now, sink);
        if result.is_err() {
            self.abandon();
        }
        result
    }

    /// Writes remaining output without pacing, stopping after the first job
    /// that hands back a continuation. Call again until it returns nothing.
    pub fn fast_forward(&mut self, sink: &mut dyn OutputSink) -> io::Result<Vec<C>> {
        let result = self.finish_all(Instant::now(), sink);
        if result.is_err() {
            self.abandon();
        }
        result
    }

    fn finish_all(&mut self, now: Instant, sink: &mut dyn OutputSink) -> io::Result<Vec<C>> {
        self.resume_at = None;
        if self.active.is_none() {
            self.resume_pending(now, sink)?;
        }
        while let Some(mut active) = self.active.take() {
            active.write_remaining(sink)?;
            if let Some(continuation) = self.hand_back(active, now, sink)? {
                sink.flush()?;
                return Ok(vec![continuation]);
            }
        }
        sink.flush()?;
        Ok(Vec::new())
    }

    fn advance(&mut self, now: Instant, sink: &mut dyn OutputSink) -> io::Result<Vec<C>> {
        self.resume_at = None;
        if self.active.is_none() {
            self.resume_pending(now, sink)?;
        }
        let mut finished = Vec::new();
        while let Some(active) = self.active.as_mut() {
            if active.deadline > now {
                break;
            }
            if active.step(now, sink, &mut self.rng)? {
                if let Some(done) = self.active.take() {
                    if let Some(continuation) = self.hand_back(done, now, sink)? {
                        finished.push(continuation);
                        break;
                    }
                }
            }
        }
        sink.flush()?;
        Ok(finished)
    }

    /// Writes the lines held behind a finished job. With a continuation the
    /// next queued job waits for the following tick; otherwise it starts now.
    fn hand_back(
        &mut self,
        done: ActiveJob<C>,
        now: Instant,
        sink: &mut dyn OutputSink,
    ) -> io::Result<Option<C>> {
        while let Some(Pending::Line(line)) = self.pending.front() {
            write_line(line, sink)?;
            self.pending.pop_front();
        }
        match done.continuation {
            Some(continuation) => {
                if !self.pending.is_empty() {
                    self.resume_at = Some(now);
                }
                Ok(Some(continuation))
            }
            None => {
                self.resume_pending(now, sink)?;
                Ok(None)
            }
        }
    }

    fn resume_pending(&mut self, now: Instant, sink: &mut dyn OutputSink) -> io::Result<()> {
        while let Some(next) = self.pending.pop_front() {
            match next {
                Pending::Line(line) => write_line(&line, sink)?,
                Pending::Job(job) => {
                    self.active = Some(ActiveJob::start(job, now));
                    break;
                }
            }
        }
        Ok(())
    }

    fn abandon(&mut self) {
        self.active = None;
        self.resume_at = None;
        self.pending.clear();
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.is_empty().then_some("").into_iter().chain(text.lines())
}

fn write_line(line: &str, sink: &mut dyn OutputSink) -> io::Result<()> {
    sink.write_text(line)?;
    sink.newline()
}
