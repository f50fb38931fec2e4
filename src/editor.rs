//! Editing boundary: text coercion for field input, circle specs from the
//! command line, and the discrete edits bound to keys, including a selected
//! circle whose fields can be nudged, typed in, or removed.

use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::circles::{Circle, CircleId, CircleSet, DEFAULT_RADIUS};
use crate::error::{ConfigError, EditError};
use crate::params::SharedParams;

/// Parse user-typed numeric text. Non-numbers and non-finite values never
/// reach a circle field or parameter.
pub fn parse_number(text: &str) -> Result<f64, EditError> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| EditError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(EditError::NonFinite(value));
    }
    Ok(value)
}

/// Editable numeric field of a circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleField {
    Radius,
    RelativeSpeed,
}

/// Apply text input to one field of a circle, returning the value written.
pub fn edit_field(
    circles: &CircleSet,
    id: CircleId,
    field: CircleField,
    text: &str,
) -> Result<f64, EditError> {
    let value = parse_number(text)?;
    match field {
        CircleField::Radius => circles.set_radius(id, value)?,
        CircleField::RelativeSpeed => circles.set_relative_speed(id, value)?,
    }
    Ok(value)
}

/// Initial circle given as `RADIUS:SPEED` on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSpec {
    pub radius: f64,
    pub relative_speed: f64,
}

impl FromStr for CircleSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::CircleSpec {
            spec: s.to_string(),
        };
        let (radius, speed) = s.split_once(':').ok_or_else(invalid)?;
        let radius = parse_number(radius).map_err(|_| invalid())?;
        let relative_speed = parse_number(speed).map_err(|_| invalid())?;
        Ok(Self {
            radius,
            relative_speed,
        })
    }
}

/// Text being typed into one field of a circle
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub id: CircleId,
    pub field: CircleField,
    pub text: String,
}

/// Discrete edit triggered from the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    AddCircle,
    AddHarmonicPair,
    RemoveLast,
    ToggleLockView,
    /// Add to the fundamental (Hz)
    NudgeFundamental(f64),
    /// Multiply the zoom
    ScaleZoom(f64),
    /// Add to the volume, floored at zero
    NudgeVolume(f64),

    /// Move the selection one circle along the chain
    SelectNext,
    SelectPrevious,
    RemoveSelected,
    /// Add to the selected circle's radius
    NudgeRadius(f64),
    /// Add to the selected circle's relative speed
    NudgeSpeed(f64),

    /// Start typing a new value for a field of the selected circle
    BeginEntry(CircleField),
    TypeChar(char),
    EraseChar,
    /// Parse the typed text and write it to the field
    CommitEntry,
    CancelEntry,
}

/// Editing state shared by the keyboard controls: the selected circle and
/// any field entry in progress.
pub struct Editor {
    circles: CircleSet,
    params: Arc<SharedParams>,
    selected: Option<CircleId>,
    entry: Option<FieldEntry>,
}

impl Editor {
    pub fn new(circles: CircleSet, params: Arc<SharedParams>) -> Self {
        Self {
            circles,
            params,
            selected: None,
            entry: None,
        }
    }

    /// Selected circle, if it is still in the set
    pub fn selected(&self) -> Option<CircleId> {
        self.selected.filter(|&id| self.circles.get(id).is_some())
    }

    pub fn entry(&self) -> Option<&FieldEntry> {
        self.entry.as_ref()
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditError> {
        let circles = &self.circles;
        let params = &self.params;

        match action {
            EditorAction::AddCircle => {
                let id = circles.add(DEFAULT_RADIUS);
                info!("Added circle {} ({} total)", id, circles.len());
            }
            EditorAction::AddHarmonicPair => {
                let (a, b) = circles.add_harmonic_pair();
                info!("Added harmonic pair {} {} ({} total)", a, b, circles.len());
            }
            EditorAction::RemoveLast => {
                if let Some(id) = circles.remove_last() {
                    info!("Removed circle {} ({} left)", id, circles.len());
                }
            }
            EditorAction::ToggleLockView => {
                let locked = params.toggle_lock_view();
                info!("Lock view: {}", if locked { "on" } else { "off" });
            }
            EditorAction::NudgeFundamental(delta) => {
                params.set_fundamental_hz(params.fundamental_hz() + delta)?;
                info!("Fundamental: {:.1} Hz", params.fundamental_hz());
            }
            EditorAction::ScaleZoom(factor) => {
                params.set_zoom_px(params.zoom_px() * factor)?;
                info!("Zoom: {:.1} px/unit", params.zoom_px());
            }
            EditorAction::NudgeVolume(delta) => {
                params.set_volume((params.volume() + delta).max(0.0))?;
                info!("Volume: {:.2}", params.volume());
            }
            EditorAction::SelectNext => self.cycle_selection(true),
            EditorAction::SelectPrevious => self.cycle_selection(false),
            EditorAction::RemoveSelected => self.remove_selected()?,
            EditorAction::NudgeRadius(delta) => {
                let circle = self.target()?;
                circles.set_radius(circle.id(), circle.radius() + delta)?;
                info!("Circle {} radius: {:.3}", circle.id(), circle.radius());
            }
            EditorAction::NudgeSpeed(delta) => {
                let circle = self.target()?;
                circles.set_relative_speed(circle.id(), circle.relative_speed() + delta)?;
                info!("Circle {} speed: {}", circle.id(), circle.relative_speed());
            }
            EditorAction::BeginEntry(field) => {
                let id = self.target()?.id();
                info!("Editing {:?} of circle {} (Enter to apply, Esc to cancel)", field, id);
                self.entry = Some(FieldEntry {
                    id,
                    field,
                    text: String::new(),
                });
            }
            EditorAction::TypeChar(c) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.text.push(c);
                }
            }
            EditorAction::EraseChar => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.text.pop();
                }
            }
            EditorAction::CommitEntry => {
                if let Some(entry) = self.entry.take() {
                    let value = edit_field(circles, entry.id, entry.field, &entry.text)?;
                    info!("Circle {} {:?}: {}", entry.id, entry.field, value);
                }
            }
            EditorAction::CancelEntry => self.entry = None,
        }
        Ok(())
    }

    fn target(&self) -> Result<Arc<Circle>, EditError> {
        let id = self.selected.ok_or(EditError::NoSelection)?;
        self.circles.get(id).ok_or(EditError::UnknownCircle(id))
    }

    fn cycle_selection(&mut self, forward: bool) {
        let ids = self.circles.ids();
        if ids.is_empty() {
            self.selected = None;
            return;
        }

        let position = self
            .selected
            .and_then(|selected| ids.iter().position(|&id| id == selected));
        let index = match (position, forward) {
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
            (None, true) => 0,
            (None, false) => ids.len() - 1,
        };
        self.selected = Some(ids[index]);

        if let Some(circle) = self.circles.get(ids[index]) {
            info!(
                "Selected circle {} ({} of {}): radius {:.3}, speed {}",
                circle.id(),
                index + 1,
                ids.len(),
                circle.radius(),
                circle.relative_speed()
            );
        }
    }

    /// Remove the selected circle and select the one that took its place in
    /// the chain (or the new last one).
    fn remove_selected(&mut self) -> Result<(), EditError> {
        let id = self.target()?.id();
        let position = self.circles.ids().iter().position(|&c| c == id);

        if self.circles.remove(id) {
            info!("Removed circle {} ({} left)", id, self.circles.len());
        }
        if self.entry.as_ref().is_some_and(|entry| entry.id == id) {
            self.entry = None;
        }

        let remaining = self.circles.ids();
        self.selected = position
            .map(|i| i.min(remaining.len().saturating_sub(1)))
            .and_then(|i| remaining.get(i).copied());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> (Editor, CircleSet, Arc<SharedParams>) {
        let circles = CircleSet::new();
        let params = Arc::new(SharedParams::default());
        let editor = Editor::new(circles.clone(), Arc::clone(&params));
        (editor, circles, params)
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 0.25 "), Ok(0.25));
        assert_eq!(parse_number("-3"), Ok(-3.0));
        assert_eq!(parse_number("abc"), Err(EditError::NotANumber("abc".to_string())));
        assert_eq!(parse_number(""), Err(EditError::NotANumber(String::new())));
        assert_eq!(parse_number("inf"), Err(EditError::NonFinite(f64::INFINITY)));
        assert!(matches!(parse_number("NaN"), Err(EditError::NonFinite(_))));
    }

    #[test]
    fn test_edit_field_rejects_bad_text_without_writing() {
        let circles = CircleSet::new();
        let id = circles.add(0.5);

        assert!(edit_field(&circles, id, CircleField::Radius, "oops").is_err());
        assert_eq!(circles.get(id).unwrap().radius(), 0.5);

        assert_eq!(edit_field(&circles, id, CircleField::RelativeSpeed, "2.5"), Ok(2.5));
        assert_eq!(circles.get(id).unwrap().relative_speed(), 2.5);
    }

    #[test]
    fn test_circle_spec_from_str() {
        assert_eq!(
            "0.5:-3".parse::<CircleSpec>().unwrap(),
            CircleSpec {
                radius: 0.5,
                relative_speed: -3.0
            }
        );
        assert!("0.5".parse::<CircleSpec>().is_err());
        assert!("x:1".parse::<CircleSpec>().is_err());
        assert!("1:inf".parse::<CircleSpec>().is_err());
    }

    #[test]
    fn test_editor_actions() {
        let (mut editor, circles, params) = editor();

        editor.apply(EditorAction::AddHarmonicPair).unwrap();
        editor.apply(EditorAction::AddCircle).unwrap();
        assert_eq!(circles.len(), 3);

        editor.apply(EditorAction::RemoveLast).unwrap();
        assert_eq!(circles.len(), 2);

        editor.apply(EditorAction::NudgeFundamental(-10.0)).unwrap();
        assert_eq!(params.fundamental_hz(), 100.0);

        editor.apply(EditorAction::ScaleZoom(2.0)).unwrap();
        assert_eq!(params.zoom_px(), 200.0);

        editor.apply(EditorAction::NudgeVolume(-1.0)).unwrap();
        assert_eq!(params.volume(), 0.0);

        editor.apply(EditorAction::ToggleLockView).unwrap();
        assert!(!params.lock_view());
    }

    #[test]
    fn test_remove_last_on_empty_set_is_noop() {
        let (mut editor, circles, _params) = editor();
        assert!(editor.apply(EditorAction::RemoveLast).is_ok());
        assert!(circles.is_empty());
    }

    #[test]
    fn test_selection_cycles_in_chain_order() {
        let (mut editor, circles, _params) = editor();
        let a = circles.add(0.1);
        let b = circles.add(0.2);
        let c = circles.add(0.3);

        editor.apply(EditorAction::SelectNext).unwrap();
        assert_eq!(editor.selected(), Some(a));
        editor.apply(EditorAction::SelectNext).unwrap();
        editor.apply(EditorAction::SelectNext).unwrap();
        assert_eq!(editor.selected(), Some(c));
        editor.apply(EditorAction::SelectNext).unwrap();
        assert_eq!(editor.selected(), Some(a));

        editor.apply(EditorAction::SelectPrevious).unwrap();
        assert_eq!(editor.selected(), Some(c));
        editor.apply(EditorAction::SelectPrevious).unwrap();
        assert_eq!(editor.selected(), Some(b));
    }

    #[test]
    fn test_edit_and_remove_middle_circle() {
        let (mut editor, circles, _params) = editor();
        let first = circles.add_with_speed(0.5, 1.0);
        let middle = circles.add_with_speed(0.25, -1.0);
        let last = circles.add_with_speed(0.125, 2.0);

        editor.apply(EditorAction::SelectNext).unwrap();
        editor.apply(EditorAction::SelectNext).unwrap();
        assert_eq!(editor.selected(), Some(middle));

        editor.apply(EditorAction::NudgeRadius(0.25)).unwrap();
        editor.apply(EditorAction::NudgeSpeed(-1.0)).unwrap();
        let circle = circles.get(middle).unwrap();
        assert_eq!(circle.radius(), 0.5);
        assert_eq!(circle.relative_speed(), -2.0);

        editor.apply(EditorAction::BeginEntry(CircleField::Radius)).unwrap();
        for c in "0.75".chars() {
            editor.apply(EditorAction::TypeChar(c)).unwrap();
        }
        editor.apply(EditorAction::CommitEntry).unwrap();
        assert_eq!(circle.radius(), 0.75);
        assert!(editor.entry().is_none());

        // Neighbours are untouched
        assert_eq!(circles.get(first).unwrap().radius(), 0.5);
        assert_eq!(circles.get(last).unwrap().relative_speed(), 2.0);

        editor.apply(EditorAction::RemoveSelected).unwrap();
        assert_eq!(circles.ids(), vec![first, last]);
        assert_eq!(editor.selected(), Some(last));

        editor.apply(EditorAction::RemoveSelected).unwrap();
        assert_eq!(circles.ids(), vec![first]);
        assert_eq!(editor.selected(), Some(first));

        editor.apply(EditorAction::RemoveSelected).unwrap();
        assert!(circles.is_empty());
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_circle_edits_need_a_selection() {
        let (mut editor, circles, _params) = editor();
        circles.add(0.1);

        assert_eq!(
            editor.apply(EditorAction::NudgeRadius(0.1)),
            Err(EditError::NoSelection)
        );
        assert_eq!(
            editor.apply(EditorAction::RemoveSelected),
            Err(EditError::NoSelection)
        );
        assert_eq!(
            editor.apply(EditorAction::BeginEntry(CircleField::Radius)),
            Err(EditError::NoSelection)
        );
        assert_eq!(circles.len(), 1);
    }

    #[test]
    fn test_selection_lapses_when_circle_is_removed_elsewhere() {
        let (mut editor, circles, _params) = editor();
        circles.add(0.1);
        let id = circles.add(0.2);

        editor.apply(EditorAction::SelectPrevious).unwrap();
        assert_eq!(editor.selected(), Some(id));

        editor.apply(EditorAction::RemoveLast).unwrap();
        assert_eq!(editor.selected(), None);
        assert_eq!(
            editor.apply(EditorAction::NudgeSpeed(1.0)),
            Err(EditError::UnknownCircle(id))
        );
    }

    #[test]
    fn test_rejected_entry_leaves_field_unchanged() {
        let (mut editor, circles, _params) = editor();
        let id = circles.add_with_speed(0.5, 3.0);
        editor.apply(EditorAction::SelectNext).unwrap();

        editor.apply(EditorAction::BeginEntry(CircleField::RelativeSpeed)).unwrap();
        for c in "4x".chars() {
            editor.apply(EditorAction::TypeChar(c)).unwrap();
        }
        assert_eq!(editor.entry().unwrap().text, "4x");
        editor.apply(EditorAction::EraseChar).unwrap();
        editor.apply(EditorAction::TypeChar('!')).unwrap();

        assert_eq!(
            editor.apply(EditorAction::CommitEntry),
            Err(EditError::NotANumber("4!".to_string()))
        );
        assert_eq!(circles.get(id).unwrap().relative_speed(), 3.0);
        assert!(editor.entry().is_none());

        editor.apply(EditorAction::BeginEntry(CircleField::RelativeSpeed)).unwrap();
        editor.apply(EditorAction::TypeChar('7')).unwrap();
        editor.apply(EditorAction::CancelEntry).unwrap();
        assert!(editor.entry().is_none());
        assert_eq!(circles.get(id).unwrap().relative_speed(), 3.0);
    }
}
