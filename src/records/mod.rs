// src/records/mod.rs

//! Positional mapping of extracted period slots onto substitution records.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::extract::ClassEntry;

pub mod title;

pub use title::PlanDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Lesson,
    Kind,
    Subject,
    Room,
    OldSubject,
    MovedFrom,
    Notice,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Lesson => "lesson",
            Field::Kind => "kind",
            Field::Subject => "subject",
            Field::Room => "room",
            Field::OldSubject => "old_subject",
            Field::MovedFrom => "moved_from",
            Field::Notice => "notice",
        }
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "lesson" => Field::Lesson,
            "kind" => Field::Kind,
            "subject" => Field::Subject,
            "room" => Field::Room,
            "old_subject" => Field::OldSubject,
            "moved_from" => Field::MovedFrom,
            "notice" => Field::Notice,
            other => bail!("unknown record field {:?}", other),
        })
    }
}

/// Which record field each period slot feeds. `None` skips the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    slots: Vec<Option<Field>>,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            slots: vec![
                Some(Field::Lesson),
                Some(Field::Kind),
                Some(Field::Subject),
                Some(Field::Room),
                Some(Field::OldSubject),
                Some(Field::MovedFrom),
                Some(Field::Notice),
            ],
        }
    }
}

/// Comma separated field names in slot order, `-` for a slot to skip:
/// `lesson,-,subject,room`.
impl FromStr for FieldLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let slots = s
            .split(',')
            .map(|part| match part.trim() {
                "-" | "" => Ok(None),
                name => name.parse::<Field>().map(Some),
            })
            .collect::<Result<Vec<_>>>()?;
        if slots.iter().all(Option::is_none) {
            bail!("field layout {:?} maps no slot", s);
        }
        Ok(Self { slots })
    }
}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .slots
            .iter()
            .map(|slot| slot.map(|field| field.as_str()).unwrap_or("-"))
            .collect();
        f.write_str(&names.join(","))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub class: String,
    pub lesson: Option<String>,
    pub kind: Option<String>,
    pub subject: Option<String>,
    pub room: Option<String>,
    pub old_subject: Option<String>,
    pub moved_from: Option<String>,
    pub notice: Option<String>,
}

impl Substitution {
    fn set(&mut self, field: Field, value: Option<String>) {
        let target = match field {
            Field::Lesson => &mut self.lesson,
            Field::Kind => &mut self.kind,
            Field::Subject => &mut self.subject,
            Field::Room => &mut self.room,
            Field::OldSubject => &mut self.old_subject,
            Field::MovedFrom => &mut self.moved_from,
            Field::Notice => &mut self.notice,
        };
        *target = value;
    }
}

/// Record `r` takes the `r`-th value of every slot. Slots holding fewer
/// values leave the field empty, so short rows shift nothing.
pub fn records(entry: &ClassEntry, layout: &FieldLayout) -> Vec<Substitution> {
    let rows = entry.periods.iter().map(Vec::len).max().unwrap_or(0);

    (0..rows)
        .map(|r| {
            let mut rec = Substitution {
                class: entry.name.clone(),
                ..Substitution::default()
            };
            for (slot, field) in layout.slots.iter().enumerate() {
                let Some(field) = field else { continue };
                let value = entry
                    .periods
                    .get(slot)
                    .and_then(|values| values.get(r))
                    .and_then(|v| clean(v));
                rec.set(*field, value);
            }
            rec
        })
        .collect()
}

pub fn all_records(entries: &[ClassEntry], layout: &FieldLayout) -> Vec<Substitution> {
    entries.iter().flat_map(|e| records(e, layout)).collect()
}

fn clean(raw: &str) -> Option<String> {
    // trim() also strips &nbsp;
    let v = raw.trim();
    if v.is_empty() || v == "---" {
        None
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, periods: &[&[&str]]) -> ClassEntry {
        ClassEntry {
            name: name.into(),
            periods: periods
                .iter()
                .map(|slot| slot.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn maps_slots_by_position() {
        let e = entry(
            "7a",
            &[
                &["1 - 2", "5"],
                &["Entfall", "Vertretung"],
                &["Ma", "Bio"],
                &["", "R12"],
            ],
        );
        let recs = records(&e, &FieldLayout::default());
        assert_eq!(recs.len(), 2);
        assert_eq!(
            recs[0],
            Substitution {
                class: "7a".into(),
                lesson: Some("1 - 2".into()),
                kind: Some("Entfall".into()),
                subject: Some("Ma".into()),
                ..Substitution::default()
            }
        );
        assert_eq!(recs[1].room.as_deref(), Some("R12"));
        assert_eq!(recs[1].notice, None);
    }

    #[test]
    fn short_slots_leave_fields_empty() {
        let e = entry("9b", &[&["1", "2", "3"], &["Entfall"]]);
        let recs = records(&e, &FieldLayout::default());
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2].lesson.as_deref(), Some("3"));
        assert_eq!(recs[2].kind, None);
    }

    #[test]
    fn entry_without_values_has_no_records() {
        let e = entry("5c", &[&[], &[]]);
        assert!(records(&e, &FieldLayout::default()).is_empty());
    }

    #[test]
    fn placeholder_cells_are_empty() {
        let e = entry("6a", &[&["3"], &["---"], &["\u{a0}"]]);
        let rec = &records(&e, &FieldLayout::default())[0];
        assert_eq!(rec.kind, None);
        assert_eq!(rec.subject, None);
    }

    #[test]
    fn custom_layout_skips_slots() {
        let layout: FieldLayout = "lesson, -, room".parse().unwrap();
        assert_eq!(layout.to_string(), "lesson,-,room");
        let e = entry("Q2", &[&["4"], &["ignored"], &["A101"], &["beyond"]]);
        let rec = &records(&e, &layout)[0];
        assert_eq!(rec.lesson.as_deref(), Some("4"));
        assert_eq!(rec.kind, None);
        assert_eq!(rec.room.as_deref(), Some("A101"));
        assert_eq!(rec.notice, None);
    }

    #[test]
    fn bad_layouts_are_rejected() {
        assert!("lesson,teacher".parse::<FieldLayout>().is_err());
        assert!("-,-".parse::<FieldLayout>().is_err());
    }

    #[test]
    fn default_layout_round_trips_through_text() {
        let text = FieldLayout::default().to_string();
        assert_eq!(text, "lesson,kind,subject,room,old_subject,moved_from,notice");
        assert_eq!(text.parse::<FieldLayout>().unwrap(), FieldLayout::default());
    }

    #[test]
    fn all_records_keeps_entry_order() {
        let entries = vec![entry("5a", &[&["1"]]), entry("5b", &[&["2"], &["x"]])];
        let recs = all_records(&entries, &FieldLayout::default());
        let classes: Vec<_> = recs.iter().map(|r| r.class.as_str()).collect();
        assert_eq!(classes, ["5a", "5b"]);
    }
}
