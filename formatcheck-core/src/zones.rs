// Structural zone tracking
//
//   front_matter ──CONTENTS──▶ toc ──first heading──▶ body ──APPENDICES──▶ appendix
//                                                                   └──▶ (stop)
//
// Transitions only move forward. The tracker is driven once per document to
// build a `ZoneMap`; checkers read the map instead of keeping their own state.

use crate::config::{AppendixPolicy, Markers};
use crate::text::ends_with_page_number;
use crate::topics::TopicSet;
use crate::types::{Paragraph, Zone};

pub struct ZoneTracker<'a> {
    contents_marker: String,
    appendix_marker: &'a str,
    topics: &'a TopicSet,
    policy: AppendixPolicy,
    current: Zone,
    stopped: bool,
    seen_contents: bool,
}

impl<'a> ZoneTracker<'a> {
    pub fn new(markers: &'a Markers, topics: &'a TopicSet, policy: AppendixPolicy) -> Self {
        Self {
            contents_marker: markers.contents.to_uppercase(),
            appendix_marker: markers.appendices.trim(),
            topics,
            policy,
            current: Zone::FrontMatter,
            stopped: false,
            seen_contents: false,
        }
    }

    pub fn current(&self) -> Zone {
        self.current
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn seen_contents(&self) -> bool {
        self.seen_contents
    }

    /// Classify the next paragraph. `None` once scanning has stopped.
    pub fn advance(&mut self, text: &str) -> Option<Zone> {
        if self.stopped {
            return None;
        }

        let text = text.trim_matches(|c: char| c.is_whitespace() || c.is_control());
        if text.is_empty() {
            return Some(self.current);
        }

        match self.current {
            Zone::FrontMatter => {
                if text.to_uppercase().contains(&self.contents_marker) {
                    self.seen_contents = true;
                    self.current = Zone::Toc;
                }
            }
            Zone::Toc => {
                // Entries carry their page number; the real heading does not
                if !ends_with_page_number(text) && self.topics.matches_any(text) {
                    log::debug!("Body starts at '{text}'");
                    self.current = Zone::Body;
                }
            }
            Zone::Body => {
                if text == self.appendix_marker {
                    match self.policy {
                        AppendixPolicy::SkipRemaining => {
                            log::debug!("Appendices start, skipping the rest");
                            self.current = Zone::Appendix;
                        }
                        AppendixPolicy::Stop => {
                            log::debug!("Appendices start, scanning stops");
                            self.stopped = true;
                            return None;
                        }
                    }
                }
            }
            Zone::Appendix => {}
        }

        Some(self.current)
    }
}

/// Zone of every paragraph, computed once per document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneMap {
    zones: Vec<Option<Zone>>,
    has_contents: bool,
}

impl ZoneMap {
    pub fn build(
        paragraphs: &[Paragraph],
        markers: &Markers,
        topics: &TopicSet,
        policy: AppendixPolicy,
    ) -> Self {
        let mut tracker = ZoneTracker::new(markers, topics, policy);
        let zones = paragraphs.iter().map(|p| tracker.advance(&p.text)).collect();
        Self {
            zones,
            has_contents: tracker.seen_contents(),
        }
    }

    /// Every paragraph is body text. Used for fragments without a title page.
    pub fn uniform(len: usize, zone: Zone) -> Self {
        Self {
            zones: vec![Some(zone); len],
            has_contents: false,
        }
    }

    pub fn has_contents(&self) -> bool {
        self.has_contents
    }

    pub fn zone_of(&self, index: usize) -> Option<Zone> {
        self.zones.get(index).copied().flatten()
    }

    pub fn is_in(&self, index: usize, zones: &[Zone]) -> bool {
        matches!(self.zone_of(index), Some(zone) if zones.contains(&zone))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Paragraphs that got no zone because scanning stopped
    pub fn unscanned(&self) -> usize {
        self.zones.iter().filter(|z| z.is_none()).count()
    }
}
