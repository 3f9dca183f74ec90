use eframe::egui::{self, Color32};

use super::widgets;
use crate::display::{AggregateView, NodeListView};
use crate::forms::nodes::{
    AggregateForm, CreateNodeMultiForm, CreateNodeSingleForm, CreateNodeWithPropsForm, DeleteNodesForm,
    RemoveNodePropsForm, SearchForm, UpdateNodesForm, MIN_NODE_PROPERTIES,
};
use crate::forms::Submission;
use crate::graph_utils::graph::Operator;
use crate::persistence::export::{self, ExportFormat};
use crate::persistence::settings::AppSettings;
use crate::store::NodeSessionStore;

pub struct NodePage {
    search: Submission<SearchForm>,
    aggregate: Submission<AggregateForm>,
    create_single: Submission<CreateNodeSingleForm>,
    create_multi: Submission<CreateNodeMultiForm>,
    create_props: Submission<CreateNodeWithPropsForm>,
    update: Submission<UpdateNodesForm>,
    remove_props: Submission<RemoveNodePropsForm>,
    delete: Submission<DeleteNodesForm>,
    export_format: ExportFormat,
    export_status: Option<Result<String, String>>,
}

impl NodePage {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            search: Submission::new(SearchForm::new(settings.search_limit())),
            aggregate: Submission::new(AggregateForm::default()),
            create_single: Submission::new(CreateNodeSingleForm::default()),
            create_multi: Submission::new(CreateNodeMultiForm::default()),
            create_props: Submission::new(CreateNodeWithPropsForm::new(settings.value_policy)),
            update: Submission::new(UpdateNodesForm::new(settings.value_policy)),
            remove_props: Submission::new(RemoveNodePropsForm::default()),
            delete: Submission::new(DeleteNodesForm::default()),
            export_format: ExportFormat::Json,
            export_status: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &AppSettings) {
        self.search.form.default_limit = settings.search_limit();
        self.create_props.form.policy = settings.value_policy;
        self.update.form.policy = settings.value_policy;
    }

    pub fn poll(&mut self) {
        self.search.poll();
        self.aggregate.poll();
        self.create_single.poll();
        self.create_multi.poll();
        self.create_props.poll();
        self.update.poll();
        self.remove_props.poll();
        self.delete.poll();
    }

    pub fn in_flight(&self) -> bool {
        self.search.in_flight()
            || self.aggregate.in_flight()
            || self.create_single.in_flight()
            || self.create_multi.in_flight()
            || self.create_props.in_flight()
            || self.update.in_flight()
            || self.remove_props.in_flight()
            || self.delete.in_flight()
    }

    /// Forms on the left, results on the right.
    pub fn show(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore, settings: &AppSettings) {
        ui.columns(2, |cols| {
            egui::ScrollArea::vertical().id_salt("node_forms").auto_shrink([false, false]).show(&mut cols[0], |ui| {
                self.search_section(ui, store);
                self.aggregate_section(ui, store);
                self.create_sections(ui, store);
                self.bulk_sections(ui, store);
            });
            egui::ScrollArea::both().id_salt("node_results").auto_shrink([false, false]).show(&mut cols[1], |ui| {
                self.results(ui, store, settings);
            });
        });
    }

    fn search_section(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore) {
        egui::CollapsingHeader::new("Search Nodes").default_open(true).show(ui, |ui| {
            let form = &mut self.search.form;
            widgets::labeled_field(ui, "Labels", &mut form.labels, "Person, Employee");
            ui.label("Filters");
            let mut to_remove: Option<usize> = None;
            let removable = form.filters.len() > 1;
            for (i, row) in form.filters.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut row.property).hint_text("property").desired_width(100.0));
                    egui::ComboBox::from_id_salt(("filter_op", i))
                        .selected_text(row.operator.as_str())
                        .width(90.0)
                        .show_ui(ui, |ui| {
                            for op in Operator::ALL {
                                ui.selectable_value(&mut row.operator, op, op.as_str());
                            }
                        });
                    let hint = if row.operator.takes_list() { "a, b, c" } else { "value" };
                    ui.add(egui::TextEdit::singleline(&mut row.value).hint_text(hint).desired_width(120.0));
                    if removable && ui.button("-").on_hover_text("Remove filter").clicked() {
                        to_remove = Some(i);
                    }
                });
            }
            if let Some(i) = to_remove {
                form.remove_filter(i);
            }
            if ui.button("+ Add filter").clicked() {
                form.add_filter();
            }
            widgets::labeled_field(ui, "Limit", &mut form.limit, "100");
            widgets::submit(ui, &mut self.search, store, "Search", "Searching...");
        });
    }

    fn aggregate_section(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore) {
        egui::CollapsingHeader::new("Aggregate").default_open(false).show(ui, |ui| {
            let form = &mut self.aggregate.form;
            ui.horizontal(|ui| {
                ui.label("Label");
                ui.add(egui::TextEdit::singleline(&mut form.label).hint_text("Person").desired_width(100.0));
                ui.label("Numeric property");
                ui.add(egui::TextEdit::singleline(&mut form.property).hint_text("age").desired_width(100.0));
            });
            widgets::submit(ui, &mut self.aggregate, store, "Query", "Computing...");
            widgets::feedback(ui, &self.aggregate.form.feedback);
        });
    }

    fn create_sections(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore) {
        egui::CollapsingHeader::new("Create Node").default_open(false).show(ui, |ui| {
            widgets::labeled_field(ui, "Label", &mut self.create_single.form.label, "Person");
            widgets::submit(ui, &mut self.create_single, store, "Create", "Creating...");
            widgets::feedback(ui, &self.create_single.form.feedback);
        });

        egui::CollapsingHeader::new("Create Node (multiple labels)").default_open(false).show(ui, |ui| {
            widgets::labeled_field(ui, "Labels", &mut self.create_multi.form.labels, "Person, Employee");
            widgets::submit(ui, &mut self.create_multi, store, "Create", "Creating...");
            widgets::feedback(ui, &self.create_multi.form.feedback);
        });

        egui::CollapsingHeader::new("Create Node (with properties)").default_open(false).show(ui, |ui| {
            widgets::labeled_field(ui, "Label", &mut self.create_props.form.label, "Person");
            ui.label(format!("Properties (at least {})", MIN_NODE_PROPERTIES));
            widgets::property_rows(ui, &mut self.create_props.form.properties, MIN_NODE_PROPERTIES);
            widgets::submit(ui, &mut self.create_props, store, "Create", "Creating...");
            widgets::feedback(ui, &self.create_props.form.feedback);
        });
    }

    fn bulk_sections(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore) {
        egui::CollapsingHeader::new("Update Node Properties").default_open(false).show(ui, |ui| {
            let form = &mut self.update.form;
            widgets::labeled_field(ui, "Label", &mut form.label, "Person");
            widgets::labeled_field(ui, "Node IDs", &mut form.node_ids, "1, 2, 3");
            widgets::property_rows(ui, &mut form.properties, 1);
            widgets::submit(ui, &mut self.update, store, "Update", "Updating...");
            widgets::feedback(ui, &self.update.form.feedback);
        });

        egui::CollapsingHeader::new("Remove Node Properties").default_open(false).show(ui, |ui| {
            let form = &mut self.remove_props.form;
            widgets::labeled_field(ui, "Label", &mut form.label, "Person");
            widgets::labeled_field(ui, "Node IDs", &mut form.node_ids, "1, 2, 3");
            widgets::name_rows(ui, &mut form.properties);
            widgets::submit(ui, &mut self.remove_props, store, "Remove", "Removing...");
            widgets::feedback(ui, &self.remove_props.form.feedback);
        });

        egui::CollapsingHeader::new("Delete Nodes").default_open(false).show(ui, |ui| {
            let form = &mut self.delete.form;
            widgets::labeled_field(ui, "Label", &mut form.label, "Person");
            widgets::labeled_field(ui, "Node IDs", &mut form.node_ids, "1, 2, 3");
            widgets::submit(ui, &mut self.delete, store, "Delete", "Deleting...");
            widgets::feedback(ui, &self.delete.form.feedback);
        });
    }

    fn results(&mut self, ui: &mut egui::Ui, store: &NodeSessionStore, settings: &AppSettings) {
        let session = store.snapshot();

        match AggregateView::from_session(&session) {
            AggregateView::Hidden => {}
            AggregateView::Loading => {
                ui.label("Computing aggregation...");
                ui.separator();
            }
            AggregateView::Error(msg) => {
                ui.colored_label(Color32::RED, format!("Error: {}", msg));
                ui.separator();
            }
            AggregateView::Results(lines) => {
                ui.strong("Aggregated results:");
                for line in lines {
                    ui.label(line);
                }
                ui.separator();
            }
        }

        let view = NodeListView::from_session(&session);
        let NodeListView::Table(rows) = &view else {
            if matches!(view, NodeListView::Error(_)) {
                ui.colored_label(Color32::RED, view.status_text().unwrap_or_default());
            } else {
                ui.label(view.status_text().unwrap_or_default());
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.label(format!("{} node(s)", rows.len()));
            ui.separator();
            if ui.selectable_label(self.export_format == ExportFormat::Json, "JSON").clicked() {
                self.export_format = ExportFormat::Json;
            }
            if ui.selectable_label(self.export_format == ExportFormat::Csv, "CSV").clicked() {
                self.export_format = ExportFormat::Csv;
            }
            if ui.button("Export").clicked() {
                let path = export::timestamped_path(&settings.export_dir(), self.export_format);
                self.export_status = Some(match export::export_nodes(session.nodes(), &path, self.export_format) {
                    Ok(()) => Ok(format!("Exported to {}", path.display())),
                    Err(e) => Err(format!("{:#}", e)),
                });
            }
        });
        match &self.export_status {
            Some(Ok(msg)) => { ui.small(msg.clone()); }
            Some(Err(e)) => { ui.colored_label(Color32::RED, e); }
            None => {}
        }

        egui::Grid::new("nodes_table").striped(true).num_columns(3).show(ui, |ui| {
            ui.strong("ID");
            ui.strong("Labels");
            ui.strong("Properties");
            ui.end_row();
            for row in rows {
                ui.monospace(&row.id);
                ui.label(&row.labels);
                ui.label(row.properties_text());
                ui.end_row();
            }
        });
    }
}
