#![forbid(unsafe_code)]

//! Messages and where they come from.
//!
//! Mock data is deterministic for a given count so snapshot output is
//! reproducible. No system time or external randomness is used.

use vlist::ItemSource;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Timestamp of the newest seeded message (2026-01-01T09:00:00Z).
const NEWEST_RECEIVED_AT: u64 = 1_767_258_000;

const SENDERS: [&str; 12] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Edsger Dijkstra",
    "Barbara Liskov",
    "Donald Knuth",
    "Frances Allen",
    "Ken Thompson",
    "Margaret Hamilton",
    "Niklaus Wirth",
    "Radia Perlman",
    "Leslie Lamport",
];

const SUBJECTS: [&str; 10] = [
    "Quarterly planning notes",
    "Re: build times on the CI runners",
    "Lunch on Thursday?",
    "Invoice for October",
    "Design review: storage engine",
    "Fwd: conference travel",
    "Release checklist",
    "Question about the scheduler",
    "Welcome to the team",
    "Incident follow-up",
];

const PREVIEWS: [&str; 8] = [
    "Attached are the notes from this morning, let me know what I missed.",
    "I had a look at the numbers and I think we can cut this in half.",
    "Works for me. I'll book the usual place for noon.",
    "Please find the invoice attached. Payment is due within 30 days.",
    "A few open questions before we commit to the on-disk format.",
    "Forwarding the itinerary so you have it in one place.",
    "Everything is green except the docs job, which is flaky again.",
    "Short version: yes, but only if we keep the queue bounded.",
];

// ---------------------------------------------------------------------------
// Deterministic pseudo-random
// ---------------------------------------------------------------------------

/// splitmix64-style scramble of `seed`.
fn det_hash(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn pick<'a>(seed: u64, options: &[&'a str]) -> &'a str {
    options[(det_hash(seed) % options.len() as u64) as usize]
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One inbox message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub sender: String,
    pub subject: String,
    pub preview: String,
    /// Unix seconds.
    pub received_at: u64,
    pub unread: bool,
    pub flagged: bool,
}

impl Message {
    /// Case-insensitive match against sender, subject and preview.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.sender.to_lowercase().contains(needle)
            || self.subject.to_lowercase().contains(needle)
            || self.preview.to_lowercase().contains(needle)
    }

    /// `HH:MM` of the receive time, UTC.
    pub fn time_label(&self) -> String {
        let secs = self.received_at % 86_400;
        format!("{:02}:{:02}", secs / 3_600, (secs % 3_600) / 60)
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Message storage, newest first.
pub trait MessageRepository {
    fn count(&self) -> usize;

    fn fetch_all(&self) -> Vec<Message>;

    /// Messages matching `query` (case-insensitive substring), newest first.
    fn search(&self, query: &str) -> Vec<Message>;

    /// Set the flag on message `id`. Returns false when no such message.
    fn set_flagged(&mut self, id: u64, flagged: bool) -> bool;
}

/// Repository backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    messages: Vec<Message>,
}

impl InMemoryRepository {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// `count` mock messages, a few minutes apart.
    pub fn seeded(count: usize) -> Self {
        let mut received_at = NEWEST_RECEIVED_AT;
        let messages = (0..count as u64)
            .map(|id| {
                let h = det_hash(id);
                let message = Message {
                    id,
                    sender: pick(id.wrapping_mul(3), &SENDERS).to_string(),
                    subject: pick(id.wrapping_mul(5), &SUBJECTS).to_string(),
                    preview: pick(id.wrapping_mul(7), &PREVIEWS).to_string(),
                    received_at,
                    unread: h % 3 == 0,
                    flagged: h % 17 == 0,
                };
                received_at = received_at.saturating_sub(60 + h % 900);
                message
            })
            .collect();
        Self { messages }
    }
}

impl MessageRepository for InMemoryRepository {
    fn count(&self) -> usize {
        self.messages.len()
    }

    fn fetch_all(&self) -> Vec<Message> {
        self.messages.clone()
    }

    fn search(&self, query: &str) -> Vec<Message> {
        let needle = query.trim().to_lowercase();
        self.messages
            .iter()
            .filter(|m| m.matches(&needle))
            .cloned()
            .collect()
    }

    fn set_flagged(&mut self, id: u64, flagged: bool) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.flagged = flagged;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// List source
// ---------------------------------------------------------------------------

/// The messages currently shown, as a list source.
///
/// The revision moves on every in-place edit so the list re-renders the
/// affected rows.
#[derive(Debug, Clone, Default)]
pub struct MessageList {
    messages: Vec<Message>,
    revision: u64,
}

impl MessageList {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            revision: 0,
        }
    }

    /// Replace the contents (new query or refetch).
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.revision += 1;
    }

    /// Edit message at `index` in place.
    pub fn update(&mut self, index: usize, edit: impl FnOnce(&mut Message)) -> Option<&Message> {
        let message = self.messages.get_mut(index)?;
        edit(message);
        self.revision += 1;
        Some(message)
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| m.unread).count()
    }
}

impl ItemSource for MessageList {
    type Item = Message;

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
