// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text tool.

use crate::editor::store::SceneStore;
use crate::error::{EditorError, EditorResult};
use crate::models::object::{ObjectId, ObjectKind, Origin, SceneObject, TextObject, Transform};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 36.0,
            fill: "#000000".to_string(),
        }
    }
}

/// Add a text object centered on the canvas.
pub fn add(store: &mut SceneStore, text: &str, style: &TextStyle) -> EditorResult<ObjectId> {
    check(text, style)?;
    let object = SceneObject::new(
        ObjectKind::Text(TextObject {
            text: text.to_string(),
            font_family: style.font_family.clone(),
            font_size: style.font_size,
            fill: style.fill.clone(),
        }),
        Transform {
            left: store.width() as f64 / 2.0,
            top: store.height() as f64 / 2.0,
            origin: Origin::CENTER,
            ..Transform::default()
        },
    );
    let id = store.add_object(object);
    if let Err(e) = store.set_active(id) {
        log::debug!("Text {} not selected: {}", id, e);
    }
    Ok(id)
}

/// Change the content and style of an existing text object.
pub fn update(store: &mut SceneStore, id: ObjectId, text: &str, style: &TextStyle) -> EditorResult<()> {
    check(text, style)?;
    match store.object(id).map(|o| &o.kind) {
        Some(ObjectKind::Text(_)) => {}
        _ => return Err(EditorError::InvalidState(format!("object {} is not text", id))),
    }
    store.modify_object(id, |object| {
        if let ObjectKind::Text(ref mut t) = object.kind {
            t.text = text.to_string();
            t.font_family = style.font_family.clone();
            t.font_size = style.font_size;
            t.fill = style.fill.clone();
        }
    })
}

fn check(text: &str, style: &TextStyle) -> EditorResult<()> {
    if text.trim().is_empty() {
        return Err(EditorError::InvalidState("text is empty".to_string()));
    }
    if !(style.font_size.is_finite() && style.font_size > 0.0) {
        return Err(EditorError::InvalidState(format!("invalid font size {}", style.font_size)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_centered_and_selected() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let id = add(&mut store, "Hello", &TextStyle::default()).unwrap();
        let object = store.object(id).unwrap();
        assert_eq!((object.transform.left, object.transform.top), (400.0, 300.0));
        assert_eq!(store.active_object().map(|o| o.id), Some(id));
    }

    #[test]
    fn test_add_while_selection_disabled_keeps_text() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        store.set_selection_enabled(false);
        let id = add(&mut store, "Hello", &TextStyle::default()).unwrap();
        assert!(store.object(id).is_some());
        assert!(store.active_object().is_none());
    }

    #[test]
    fn test_update_rejects_non_text() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let id = add(&mut store, "Hello", &TextStyle::default()).unwrap();
        let style = TextStyle {
            font_size: 48.0,
            ..TextStyle::default()
        };
        update(&mut store, id, "Bye", &style).unwrap();
        assert!(update(&mut store, ObjectId(999), "x", &style).is_err());
        assert!(add(&mut store, "  ", &style).is_err());
    }
}
