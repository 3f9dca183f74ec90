use eframe::egui::{self, Color32};

use crate::forms::relationships::EndpointFields;
use crate::forms::{Feedback, SubmitForm, Submission};

/// Success text in green, error text in red; both may be present.
pub fn feedback(ui: &mut egui::Ui, fb: &Feedback) {
    if let Some(msg) = &fb.message {
        ui.colored_label(Color32::LIGHT_GREEN, msg);
    }
    if let Some(err) = &fb.error {
        ui.colored_label(Color32::RED, format!("Error: {}", err));
    }
}

/// Submit button, disabled while the form's own request is pending.
pub fn submit<F: SubmitForm>(
    ui: &mut egui::Ui,
    sub: &mut Submission<F>,
    store: &F::Store,
    idle_text: &str,
    busy_text: &str,
) {
    let busy = sub.in_flight();
    let text = if busy { busy_text } else { idle_text };
    if ui.add_enabled(!busy, egui::Button::new(text)).clicked() {
        let ctx = ui.ctx().clone();
        sub.start(store, move || ctx.request_repaint());
    }
}

pub fn labeled_field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(value).hint_text(hint));
    });
}

/// Key/value rows; rows at or below `min` cannot be removed.
pub fn property_rows(ui: &mut egui::Ui, rows: &mut Vec<(String, String)>, min: usize) {
    let mut to_remove: Option<usize> = None;
    let removable = rows.len() > min;
    for (i, (k, v)) in rows.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(k).hint_text("key").desired_width(120.0));
            ui.label(":");
            ui.add(egui::TextEdit::singleline(v).hint_text("value").desired_width(160.0));
            if removable && ui.button("-").on_hover_text("Remove row").clicked() {
                to_remove = Some(i);
            }
        });
    }
    if let Some(i) = to_remove {
        rows.remove(i);
    }
    if ui.button("+ Add row").clicked() {
        rows.push((String::new(), String::new()));
    }
}

/// Property name rows for removal forms.
pub fn name_rows(ui: &mut egui::Ui, rows: &mut Vec<String>) {
    let mut to_remove: Option<usize> = None;
    let removable = rows.len() > 1;
    for (i, name) in rows.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(name).hint_text("property").desired_width(160.0));
            if removable && ui.button("-").on_hover_text("Remove row").clicked() {
                to_remove = Some(i);
            }
        });
    }
    if let Some(i) = to_remove {
        rows.remove(i);
    }
    if ui.button("+ Add property").clicked() {
        rows.push(String::new());
    }
}

pub fn endpoint_fields(ui: &mut egui::Ui, f: &mut EndpointFields) {
    ui.horizontal(|ui| {
        ui.label("Label 1");
        ui.add(egui::TextEdit::singleline(&mut f.label1).desired_width(90.0));
        ui.label("ID 1");
        ui.add(egui::TextEdit::singleline(&mut f.node1_id).desired_width(60.0));
    });
    ui.horizontal(|ui| {
        ui.label("Label 2");
        ui.add(egui::TextEdit::singleline(&mut f.label2).desired_width(90.0));
        ui.label("ID 2");
        ui.add(egui::TextEdit::singleline(&mut f.node2_id).desired_width(60.0));
    });
    ui.horizontal(|ui| {
        ui.label("Type");
        ui.add(egui::TextEdit::singleline(&mut f.rel_type).hint_text("e.g. KNOWS").desired_width(120.0));
    });
}
