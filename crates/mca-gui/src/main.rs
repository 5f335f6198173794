use chrono::{DateTime, Local};
use eframe::{App, egui};
use std::sync::mpsc;

use mca_core::model::{AddonType, ContentItem, PackKind, Project};
use mca_core::{GeneratedContent, GenerationClient};

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Editor,
    Manifest,
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Behavior,
    Resource,
    Preview,
}

// One in-flight generation request at most; the worker thread reports back
// through the channel and the result is applied via update_item, so a reply
// for an item deleted in the meantime is dropped.
struct PendingGeneration {
    item_id: String,
    rx: mpsc::Receiver<Result<GeneratedContent, String>>,
}

struct State {
    project: Project,
    selected: Option<String>,
    view: View,
    tab: Tab,
    status: String,
    confirm_delete: Option<String>,
    pending: Option<PendingGeneration>,
    last_export_time: Option<DateTime<Local>>,
}

struct AppGui {
    state: State,
}

impl AppGui {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: State {
                project: Project::new(),
                selected: None,
                view: View::Editor,
                tab: Tab::Behavior,
                status: "Ready".into(),
                confirm_delete: None,
                pending: None,
                last_export_time: None,
            },
        }
    }

    fn add_item(&mut self, ty: AddonType) {
        let id = self.state.project.add_item(ty).id.clone();
        self.state.selected = Some(id);
        self.state.view = View::Editor;
        self.state.tab = Tab::Behavior;
    }

    fn export_project(&mut self) {
        let suggested = mca_core::suggested_file_name(&self.state.project.manifest);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(suggested.as_str())
            .add_filter("Bedrock add-on", &["mcaddon"])
            .save_file()
        else {
            return;
        };
        match mca_core::export_to_file(&self.state.project, &path) {
            Ok(_) => {
                self.state.status = format!("Exported {}", path.display());
                self.state.last_export_time = Some(Local::now());
            }
            Err(e) => self.state.status = format!("Export error: {}", e),
        }
    }

    fn start_generation(&mut self, item: &ContentItem) {
        if self.state.pending.is_some() {
            return;
        }
        if item.name.trim().is_empty() || item.description.trim().is_empty() {
            self.state.status = "Provide a name and description first".into();
            return;
        }
        let client = match GenerationClient::from_env() {
            Ok(c) => c,
            Err(e) => {
                self.state.status = format!("Generation unavailable: {}", e);
                return;
            }
        };
        let (tx, rx) = mpsc::channel();
        let ty = item.content_type;
        let name = item.name.clone();
        let description = item.description.clone();
        std::thread::spawn(move || {
            let _ = tx.send(client.generate(ty, &name, &description));
        });
        self.state.pending = Some(PendingGeneration {
            item_id: item.id.clone(),
            rx,
        });
        self.state.status = "Generating...".into();
    }

    fn poll_generation(&mut self) {
        let Some(pending) = &self.state.pending else {
            return;
        };
        match pending.rx.try_recv() {
            Ok(result) => {
                let item_id = pending.item_id.clone();
                self.state.pending = None;
                match result {
                    Ok(generated) => {
                        if let Some(item) = self.state.project.item(&item_id) {
                            let mut updated = item.clone();
                            updated.behavior_json = generated.behavior_json;
                            updated.resource_json = generated.resource_json;
                            self.state.project.update_item(updated);
                            self.state.status = "Generation complete".into();
                        }
                    }
                    // The item keeps its prior JSON on any failure.
                    Err(e) => self.state.status = format!("Generation failed: {}", e),
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.state.pending = None;
                self.state.status = "Generation failed: worker stopped".into();
            }
        }
    }

    fn manifest_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pack Manifest");
        ui.label("Global metadata for your add-on");
        ui.separator();
        {
            let manifest = &mut self.state.project.manifest;
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut manifest.name);
            });
            ui.label("Description:");
            ui.add(
                egui::TextEdit::multiline(&mut manifest.description)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                ui.label("Version:");
                for part in manifest.version.iter_mut() {
                    ui.add(egui::DragValue::new(part).speed(1));
                }
            });
        }
        ui.separator();
        let mut regen: Option<PackKind> = None;
        ui.horizontal(|ui| {
            ui.label("Behavior pack UUID:");
            ui.monospace(&self.state.project.manifest.uuid_bp);
            if ui.button("Regenerate").clicked() {
                regen = Some(PackKind::Behavior);
            }
        });
        ui.horizontal(|ui| {
            ui.label("Resource pack UUID:");
            ui.monospace(&self.state.project.manifest.uuid_rp);
            if ui.button("Regenerate").clicked() {
                regen = Some(PackKind::Resource);
            }
        });
        if let Some(kind) = regen {
            self.state.project.regenerate_pack_id(kind);
        }
    }

    fn editor_ui(&mut self, ui: &mut egui::Ui, id: &str) {
        let Some(mut item) = self.state.project.item(id).cloned() else {
            return;
        };
        let generating = self
            .state
            .pending
            .as_ref()
            .is_some_and(|p| p.item_id == item.id);
        let mut request_generate = false;
        let mut request_delete = false;

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut item.name);
            ui.label(egui::RichText::new(item.content_type.to_string()).monospace());
            let label = if generating { "Generating..." } else { "AI Compose" };
            if ui
                .add_enabled(!generating, egui::Button::new(label))
                .clicked()
            {
                request_generate = true;
            }
            if ui.button("Delete").clicked() {
                request_delete = true;
            }
        });
        ui.label("Description:");
        ui.add(
            egui::TextEdit::multiline(&mut item.description)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Describe what this does..."),
        );
        ui.separator();
        let mut format_failed = false;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.state.tab, Tab::Behavior, "Behavior JSON");
            ui.selectable_value(&mut self.state.tab, Tab::Resource, "Resource JSON");
            ui.selectable_value(&mut self.state.tab, Tab::Preview, "Structure Preview");
            let editing = matches!(self.state.tab, Tab::Behavior | Tab::Resource);
            if editing && ui.button("Format").clicked() {
                let target = match self.state.tab {
                    Tab::Resource => &mut item.resource_json,
                    _ => &mut item.behavior_json,
                };
                format_failed = !format_json_text(target);
            }
        });
        if format_failed {
            self.state.status = "Cannot format: not valid JSON".into();
        }
        match self.state.tab {
            Tab::Behavior => {
                egui::ScrollArea::vertical()
                    .id_source("behavior_scroll")
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut item.behavior_json)
                                .code_editor()
                                .desired_rows(24)
                                .desired_width(f32::INFINITY),
                        );
                    });
            }
            Tab::Resource => {
                egui::ScrollArea::vertical()
                    .id_source("resource_scroll")
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut item.resource_json)
                                .code_editor()
                                .desired_rows(24)
                                .desired_width(f32::INFINITY),
                        );
                    });
            }
            Tab::Preview => {
                egui::ScrollArea::vertical()
                    .id_source("preview_scroll")
                    .show(ui, |ui| preview_ui(ui, &item));
            }
        }

        self.state.project.update_item(item.clone());
        if request_generate {
            self.start_generation(&item);
        }
        if request_delete {
            self.state.confirm_delete = Some(item.id.clone());
        }
    }
}

impl App for AppGui {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.poll_generation();
        if self.state.pending.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("MCAddon Studio");
                ui.separator();
                if ui.button("Export .mcaddon").clicked() {
                    self.export_project();
                }
                if let Some(time) = self.state.last_export_time {
                    ui.label(format!("Last export: {}", time.format("%Y-%m-%d %H:%M:%S")));
                }
                ui.label(&self.state.status);
            });
        });

        egui::SidePanel::left("left").show(ctx, |ui| {
            if ui
                .selectable_label(self.state.view == View::Manifest, "Manifest Settings")
                .clicked()
            {
                self.state.view = View::Manifest;
            }
            ui.separator();
            ui.label("Create New");
            let mut create: Option<AddonType> = None;
            ui.horizontal_wrapped(|ui| {
                if ui.button("Entity").clicked() {
                    create = Some(AddonType::Entity);
                }
                if ui.button("Item").clicked() {
                    create = Some(AddonType::Item);
                }
                if ui.button("Block").clicked() {
                    create = Some(AddonType::Block);
                }
                if ui.button("Recipe").clicked() {
                    create = Some(AddonType::Recipe);
                }
            });
            if let Some(ty) = create {
                self.add_item(ty);
            }
            ui.separator();
            ui.label("Your Content");
            if self.state.project.items.is_empty() {
                ui.weak("Nothing created yet.");
            }
            let mut clicked: Option<String> = None;
            let mut delete_req: Option<String> = None;
            egui::ScrollArea::vertical()
                .id_source("content_scroll")
                .show(ui, |ui| {
                    for item in &self.state.project.items {
                        ui.horizontal(|ui| {
                            let sel = self.state.view == View::Editor
                                && self.state.selected.as_deref() == Some(item.id.as_str());
                            let label = format!("{} ({})", item.name, item.content_type);
                            if ui.selectable_label(sel, label).clicked() {
                                clicked = Some(item.id.clone());
                            }
                            if ui.small_button("🗑").clicked() {
                                delete_req = Some(item.id.clone());
                            }
                        });
                    }
                });
            if let Some(id) = clicked {
                self.state.selected = Some(id);
                self.state.view = View::Editor;
            }
            if let Some(id) = delete_req {
                self.state.confirm_delete = Some(id);
            }

            if let Some(id) = self.state.confirm_delete.clone() {
                let name = self
                    .state
                    .project
                    .item(&id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "this item".into());
                ui.separator();
                ui.label(format!("Are you sure you want to delete \"{}\"?", name));
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        self.state.project.remove_item(&id);
                        if self.state.selected.as_deref() == Some(id.as_str()) {
                            self.state.selected = None;
                        }
                        self.state.confirm_delete = None;
                        self.state.status = format!("Deleted \"{}\"", name);
                    }
                    if ui.button("Cancel").clicked() {
                        self.state.confirm_delete = None;
                    }
                });
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.view {
                View::Manifest => self.manifest_ui(ui),
                View::Editor => {
                    let selected = self
                        .state
                        .selected
                        .clone()
                        .filter(|id| self.state.project.item(id).is_some());
                    match selected {
                        Some(id) => self.editor_ui(ui, &id),
                        None => {
                            ui.vertical_centered(|ui| {
                                ui.add_space(80.0);
                                ui.heading("Ready to create?");
                                ui.label(
                                    "Select something on the left or create a new entity, item, \
                                     block, or recipe to get started.",
                                );
                                if ui.button("Start with an Item").clicked() {
                                    self.add_item(AddonType::Item);
                                }
                            });
                        }
                    }
                }
            }
        });
    }
}

// Re-indent JSON text in place; leaves it untouched when it does not parse.
fn format_json_text(text: &mut String) -> bool {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(v) => {
            if let Ok(pretty) = serde_json::to_string_pretty(&v) {
                *text = pretty;
            }
            true
        }
        Err(_) => false,
    }
}

fn stat(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".into())
}

fn preview_ui(ui: &mut egui::Ui, item: &ContentItem) {
    let preview = mca_core::extract(&item.behavior_json);
    if !preview.parsed_ok {
        ui.heading("No valid JSON found");
        ui.label("Generate or fix the behavior JSON to see a structural preview.");
        return;
    }
    ui.heading(&item.name);
    ui.monospace(&preview.identifier);
    ui.separator();
    match item.content_type {
        AddonType::Entity => {
            ui.label(format!("HP: {}", stat(preview.health())));
            ui.label(format!("Speed: {}", stat(preview.movement_speed())));
        }
        AddonType::Item => {
            ui.horizontal(|ui| {
                if preview.is_tool() {
                    ui.label(egui::RichText::new("TOOL").small().strong());
                }
                if preview.is_consumable() {
                    ui.label(egui::RichText::new("CONSUMABLE").small().strong());
                }
                ui.label(egui::RichText::new("ITEM").small().strong());
            });
        }
        AddonType::Block => {
            ui.label("Block");
        }
        AddonType::Recipe => {
            ui.weak("Recipe data is structural; no visual preview available.");
            return;
        }
    }
    if !preview.components.is_empty() {
        ui.separator();
        ui.label("Components:");
        for key in preview.component_keys(4) {
            ui.label(format!("- {}", key.trim_start_matches("minecraft:")));
        }
    }
}

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::viewport::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MCAddon Studio",
        native_options,
        Box::new(|cc| Ok(Box::new(AppGui::new(cc)))),
    )
}
