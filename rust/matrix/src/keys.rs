// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Monotonic counter handing out the synthetic keys of one matrix build.
///
/// Keys are issued post-increment, so the first key equals the start value.
#[derive(Debug, Clone)]
pub struct KeySequence {
    start: u64,
    next: u64,
}

impl KeySequence {
    pub fn starting_at(start: u64) -> Self {
        Self { start, next: start }
    }

    pub fn next_key(&mut self) -> u64 {
        let key = self.next;
        self.next += 1;
        key
    }

    /// Number of keys handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - self.start
    }
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::starting_at(0)
    }
}
