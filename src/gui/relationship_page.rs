use eframe::egui;

use super::widgets;
use crate::forms::relationships::{
    CreateRelationshipForm, DeleteRelationshipsForm, RemoveRelationshipPropsForm, UpdateRelationshipsForm,
    MIN_RELATIONSHIP_PROPERTIES,
};
use crate::forms::Submission;
use crate::persistence::settings::AppSettings;
use crate::store::RelationshipStore;

pub struct RelationshipPage {
    create: Submission<CreateRelationshipForm>,
    update: Submission<UpdateRelationshipsForm>,
    remove_props: Submission<RemoveRelationshipPropsForm>,
    delete: Submission<DeleteRelationshipsForm>,
}

impl RelationshipPage {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            create: Submission::new(CreateRelationshipForm::new(settings.value_policy)),
            update: Submission::new(UpdateRelationshipsForm::new(settings.value_policy)),
            remove_props: Submission::new(RemoveRelationshipPropsForm::default()),
            delete: Submission::new(DeleteRelationshipsForm::default()),
        }
    }

    pub fn apply_settings(&mut self, settings: &AppSettings) {
        self.create.form.policy = settings.value_policy;
        self.update.form.policy = settings.value_policy;
    }

    pub fn poll(&mut self) {
        self.create.poll();
        self.update.poll();
        self.remove_props.poll();
        self.delete.poll();
    }

    pub fn in_flight(&self) -> bool {
        self.create.in_flight() || self.update.in_flight() || self.remove_props.in_flight() || self.delete.in_flight()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, store: &RelationshipStore) {
        egui::ScrollArea::vertical().id_salt("rel_forms").auto_shrink([false, false]).show(ui, |ui| {
            egui::CollapsingHeader::new("Create Relationship").default_open(true).show(ui, |ui| {
                let form = &mut self.create.form;
                widgets::endpoint_fields(ui, &mut form.endpoints);
                ui.label(format!("Properties (at least {})", MIN_RELATIONSHIP_PROPERTIES));
                widgets::property_rows(ui, &mut form.properties, MIN_RELATIONSHIP_PROPERTIES);
                widgets::submit(ui, &mut self.create, store, "Create", "Creating...");
                widgets::feedback(ui, &self.create.form.feedback);
            });

            egui::CollapsingHeader::new("Update Relationships").default_open(false).show(ui, |ui| {
                let form = &mut self.update.form;
                let mut to_remove: Option<usize> = None;
                let removable = form.rows.len() > 1;
                for (i, row) in form.rows.iter_mut().enumerate() {
                    ui.push_id(("rel_update", i), |ui| {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(format!("Relationship {}", i + 1));
                                if removable && ui.button("-").on_hover_text("Remove relationship").clicked() {
                                    to_remove = Some(i);
                                }
                            });
                            widgets::endpoint_fields(ui, &mut row.endpoints);
                            widgets::property_rows(ui, &mut row.properties, 1);
                        });
                    });
                }
                if let Some(i) = to_remove {
                    form.remove_row(i);
                }
                if ui.button("+ Add relationship").clicked() {
                    form.add_row();
                }
                widgets::submit(ui, &mut self.update, store, "Update", "Updating...");
                widgets::feedback(ui, &self.update.form.feedback);
            });

            egui::CollapsingHeader::new("Remove Relationship Properties").default_open(false).show(ui, |ui| {
                let form = &mut self.remove_props.form;
                let mut to_remove: Option<usize> = None;
                let removable = form.rows.len() > 1;
                for (i, row) in form.rows.iter_mut().enumerate() {
                    ui.push_id(("rel_remove", i), |ui| {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(format!("Relationship {}", i + 1));
                                if removable && ui.button("-").on_hover_text("Remove relationship").clicked() {
                                    to_remove = Some(i);
                                }
                            });
                            widgets::endpoint_fields(ui, &mut row.endpoints);
                            widgets::name_rows(ui, &mut row.properties);
                        });
                    });
                }
                if let Some(i) = to_remove {
                    form.remove_row(i);
                }
                if ui.button("+ Add relationship").clicked() {
                    form.add_row();
                }
                widgets::submit(ui, &mut self.remove_props, store, "Remove", "Removing...");
                widgets::feedback(ui, &self.remove_props.form.feedback);
            });

            egui::CollapsingHeader::new("Delete Relationships").default_open(false).show(ui, |ui| {
                let form = &mut self.delete.form;
                let mut to_remove: Option<usize> = None;
                let removable = form.rows.len() > 1;
                for (i, row) in form.rows.iter_mut().enumerate() {
                    ui.push_id(("rel_delete", i), |ui| {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(format!("Relationship {}", i + 1));
                                if removable && ui.button("-").on_hover_text("Remove relationship").clicked() {
                                    to_remove = Some(i);
                                }
                            });
                            widgets::endpoint_fields(ui, row);
                        });
                    });
                }
                if let Some(i) = to_remove {
                    form.remove_row(i);
                }
                if ui.button("+ Add relationship").clicked() {
                    form.add_row();
                }
                widgets::submit(ui, &mut self.delete, store, "Delete", "Deleting...");
                widgets::feedback(ui, &self.delete.form.feedback);
            });
        });
    }
}
