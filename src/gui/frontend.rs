use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32};

use super::node_page::NodePage;
use super::relationship_page::RelationshipPage;
use crate::api::{Gateway, HttpGateway};
use crate::forms::ValuePolicy;
use crate::persistence::settings::AppSettings;
use crate::store::{NodeSessionStore, RelationshipStore};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Page {
    Nodes,
    Relationships,
}

pub struct DeskApp {
    app_settings: AppSettings,
    node_store: NodeSessionStore,
    rel_store: RelationshipStore,
    page: Page,
    nodes: NodePage,
    relationships: RelationshipPage,
    // Preferences window state; edits are applied on Save
    show_prefs_window: bool,
    prefs_edit: AppSettings,
    prefs_limit_str: String,
    prefs_export_override_str: String,
    prefs_log_override_str: String,
    prefs_status: Option<String>,
    last_info: Option<(String, Instant)>,
}

fn path_to_string(p: &Option<std::path::PathBuf>) -> String {
    p.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
}

fn string_to_path(s: &str) -> Option<std::path::PathBuf> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(std::path::PathBuf::from(t)) }
}

impl DeskApp {
    pub fn new(app_settings: AppSettings, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            node_store: NodeSessionStore::new(gateway.clone()),
            rel_store: RelationshipStore::new(gateway),
            page: Page::Nodes,
            nodes: NodePage::new(&app_settings),
            relationships: RelationshipPage::new(&app_settings),
            show_prefs_window: false,
            prefs_edit: app_settings.clone(),
            prefs_limit_str: String::new(),
            prefs_export_override_str: String::new(),
            prefs_log_override_str: String::new(),
            prefs_status: None,
            last_info: None,
            app_settings,
        }
    }

    fn menu_open_prefs(&mut self) {
        self.prefs_edit = self.app_settings.clone();
        self.prefs_limit_str = self.app_settings.default_search_limit.to_string();
        self.prefs_export_override_str = path_to_string(&self.app_settings.export_override);
        self.prefs_log_override_str = path_to_string(&self.app_settings.request_log_override);
        self.prefs_status = None;
        self.show_prefs_window = true;
    }

    fn apply_prefs(&mut self) {
        let mut next = self.prefs_edit.clone();
        next.default_search_limit = match self.prefs_limit_str.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                self.prefs_status = Some("Search limit must be a positive number.".into());
                return;
            }
        };
        next.export_override = string_to_path(&self.prefs_export_override_str);
        next.request_log_override = string_to_path(&self.prefs_log_override_str);

        // A new gateway is built before anything is persisted so a bad url is rejected
        let gateway = match HttpGateway::from_settings(&next) {
            Ok(gw) => gw,
            Err(e) => {
                self.prefs_status = Some(format!("Invalid API base URL: {:#}", e));
                return;
            }
        };
        if let Err(e) = next.save() {
            self.prefs_status = Some(format!("Failed to save preferences: {:#}", e));
            return;
        }
        let gateway: Arc<dyn Gateway> = Arc::new(gateway);
        // Requests already in flight finish against the previous stores
        self.node_store = NodeSessionStore::new(gateway.clone());
        self.rel_store = RelationshipStore::new(gateway);
        self.nodes.apply_settings(&next);
        self.relationships.apply_settings(&next);
        self.app_settings = next;
        log::info!("preferences saved, api base url {}", self.app_settings.api_base_url);
        self.last_info = Some(("Preferences saved".into(), Instant::now()));
        self.show_prefs_window = false;
    }

    fn prefs_window(&mut self, ctx: &egui::Context) {
        if !self.show_prefs_window {
            return;
        }
        let mut open = true;
        egui::Window::new("Preferences")
            .open(&mut open)
            .resizable(true)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Backend");
                ui.separator();
                ui.label("API base URL:");
                ui.text_edit_singleline(&mut self.prefs_edit.api_base_url);
                ui.label("Default search limit:");
                ui.text_edit_singleline(&mut self.prefs_limit_str);

                ui.add_space(8.0);
                ui.label("Property values:");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.prefs_edit.value_policy, ValuePolicy::Typed, "Typed (numbers, booleans, lists)");
                    ui.radio_value(&mut self.prefs_edit.value_policy, ValuePolicy::Raw, "Raw text");
                });

                ui.add_space(8.0);
                ui.heading("Files");
                ui.separator();
                ui.label("Export directory (leave empty for OS temp):");
                ui.text_edit_singleline(&mut self.prefs_export_override_str);
                ui.checkbox(&mut self.prefs_edit.request_log_enabled, "Write request log");
                ui.label("Request log directory (leave empty for OS temp):");
                ui.text_edit_singleline(&mut self.prefs_log_override_str);

                ui.add_space(8.0);
                ui.label("Settings save directory:");
                ui.monospace(AppSettings::settings_dir().display().to_string());

                if let Some(msg) = &self.prefs_status {
                    ui.colored_label(Color32::RED, msg);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.apply_prefs();
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_prefs_window = false;
                    }
                });
            });
        if !open {
            self.show_prefs_window = false;
        }
    }
}

impl eframe::App for DeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Collect finished requests before drawing
        self.nodes.poll();
        self.relationships.poll();

        self.prefs_window(ctx);
        if self.last_info.as_ref().is_some_and(|(_, at)| at.elapsed() >= Duration::from_secs(3)) {
            self.last_info = None;
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Graph-Desk");
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close();
                    }
                });
                ui.menu_button("Settings", |ui| {
                    if ui.button("Preferences…").clicked() {
                        self.menu_open_prefs();
                        ui.close();
                    }
                });
                ui.separator();
                if ui.selectable_label(self.page == Page::Nodes, "Nodes").clicked() {
                    self.page = Page::Nodes;
                }
                if ui.selectable_label(self.page == Page::Relationships, "Relationships").clicked() {
                    self.page = Page::Relationships;
                }
                ui.separator();
                ui.small(&self.app_settings.api_base_url);
                if self.nodes.in_flight() || self.relationships.in_flight() {
                    ui.spinner();
                }
                if let Some((msg, _)) = &self.last_info {
                    ui.separator();
                    ui.small(msg.clone());
                    ctx.request_repaint_after(Duration::from_millis(500));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Nodes => self.nodes.show(ui, &self.node_store, &self.app_settings),
            Page::Relationships => self.relationships.show(ui, &self.rel_store),
        });
    }
}
