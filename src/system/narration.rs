use std::fmt::{Display, Formatter};

use smartstring::{LazyCompact, SmartString};

/// Whether a narration entry explains an intermediate step or belongs to the
/// final answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NarrationKind {
    /// Hidden when solving silently.
    Step,
    /// Always shown.
    Solution,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrationEntry {
    pub kind: NarrationKind,
    pub text: SmartString<LazyCompact>,
}

impl NarrationEntry {
    pub fn is_visible(&self, silent: bool) -> bool {
        !silent || self.kind == NarrationKind::Solution
    }
}

/// An append-only log of explanation fragments. Concatenating the visible
/// fragments gives the full transcript of a solve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Narration {
    entries: Vec<NarrationEntry>,
}

impl Narration {
    pub fn new() -> Narration {
        Narration::default()
    }

    pub fn step(&mut self, text: impl AsRef<str>) {
        self.push(NarrationKind::Step, text.as_ref());
    }

    pub fn solution(&mut self, text: impl AsRef<str>) {
        self.push(NarrationKind::Solution, text.as_ref());
    }

    fn push(&mut self, kind: NarrationKind, text: &str) {
        self.entries.push(NarrationEntry {
            kind,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[NarrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// The fragments shown in the requested mode, in order.
    pub fn visible(&self, silent: bool) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.is_visible(silent))
            .map(|e| e.text.as_str())
    }

    /// The concatenation of the fragments shown in the requested mode.
    pub fn transcript(&self, silent: bool) -> String {
        self.visible(silent).collect()
    }
}

impl Display for Narration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for e in &self.entries {
            f.write_str(&e.text)?;
        }
        Ok(())
    }
}
