use std::time::Duration;

use client_core::{ClientSettings, PlannerSession, SessionView, SubmissionStatus};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{CampusName, DegreeId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorCategory, UiEvent},
    orchestration::dispatch_effects,
    reducer::{reduce_action, reduce_event, EventOutcome, UiAction},
};

const NO_DEGREE_PLACEHOLDER: &str = "-- choose a degree, then a campus --";
const NO_CAMPUS_PLACEHOLDER: &str = "-- choose a campus --";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub degrees: Vec<DegreeId>,
    pub dismiss_after: Duration,
}

impl StartupConfig {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            server_url: settings.server_url.clone(),
            degrees: settings.degree_ids(),
            dismiss_after: settings.dismiss_after(),
        }
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Startup => "Startup",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Error",
    }
}

pub struct PlannerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: PlannerSession,
    server_url: String,
    filter_input: String,
    status: String,
    status_banner: Option<UiError>,
}

impl PlannerApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session: PlannerSession::new(startup.degrees, startup.dismiss_after),
            server_url: startup.server_url,
            filter_input: String::new(),
            status: "Starting".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match reduce_event(&mut self.session, event) {
                EventOutcome::Effects(effects) => {
                    dispatch_effects(&self.cmd_tx, effects, &mut self.status_banner);
                }
                EventOutcome::Status(message) => {
                    self.status = message;
                }
                EventOutcome::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    if err.is_fatal() {
                        self.status = "Backend unavailable".to_string();
                    }
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            let effects = reduce_action(&mut self.session, action);
            dispatch_effects(&self.cmd_tx, effects, &mut self.status_banner);
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{}: {}",
                                err_label(banner.category()),
                                banner.message()
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
        }
    }

    fn show_degrees(ui: &mut egui::Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
        ui.heading("Degrees");
        ui.horizontal_wrapped(|ui| {
            for toggle in &view.degrees {
                if ui
                    .selectable_label(toggle.selected, toggle.degree.as_str())
                    .clicked()
                {
                    actions.push(UiAction::ToggleDegree(toggle.degree.clone()));
                }
            }
        });
    }

    fn show_campus(ui: &mut egui::Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
        ui.heading("Campus");
        let any_degree = view.degrees.iter().any(|toggle| toggle.selected);
        let placeholder = if any_degree {
            NO_CAMPUS_PLACEHOLDER
        } else {
            NO_DEGREE_PLACEHOLDER
        };
        let mut chosen: Option<CampusName> = view.selected_campus.clone();

        ui.horizontal(|ui| {
            ui.add_enabled_ui(!view.campus_options.is_empty(), |ui| {
                egui::ComboBox::from_id_salt("campus_select")
                    .width(280.0)
                    .selected_text(
                        chosen
                            .as_ref()
                            .map(|campus| campus.to_string())
                            .unwrap_or_else(|| placeholder.to_string()),
                    )
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut chosen, None, placeholder);
                        for campus in &view.campus_options {
                            ui.selectable_value(
                                &mut chosen,
                                Some(campus.clone()),
                                campus.as_str(),
                            );
                        }
                    });
            });
            if view.campuses_loading {
                ui.spinner();
            }
        });

        if chosen != view.selected_campus {
            actions.push(UiAction::SelectCampus(chosen));
        }
    }

    fn show_courses(&mut self, ui: &mut egui::Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("Courses");
            if view.courses_loading {
                ui.spinner();
            }
        });
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.filter_input)
                .hint_text("Search courses")
                .desired_width(f32::INFINITY),
        );
        if search.changed() {
            actions.push(UiAction::SetFilter(self.filter_input.clone()));
        }

        egui::ScrollArea::vertical()
            .id_salt("course_list")
            .max_height(320.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if view.courses.is_empty() {
                    ui.weak("Choose a degree and a campus to see courses.");
                }
                for entry in view.courses.iter().filter(|entry| entry.visible) {
                    if ui
                        .selectable_label(entry.selected, entry.name.as_str())
                        .clicked()
                    {
                        actions.push(UiAction::ToggleCourse(entry.name.clone()));
                    }
                }
            });
    }

    fn show_chips(ui: &mut egui::Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
        ui.heading(format!("Selected courses ({})", view.chips.len()));
        ui.horizontal_wrapped(|ui| {
            for chip in &view.chips {
                egui::Frame::NONE
                    .fill(ui.visuals().selection.bg_fill)
                    .corner_radius(12.0)
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui.small_button("×").on_hover_text("Remove").clicked() {
                                actions.push(UiAction::ToggleCourse(chip.name.clone()));
                            }
                            ui.label(chip.name.as_str());
                        });
                    });
            }
        });
    }

    fn show_submit(ui: &mut egui::Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
        let awaiting = view.status == SubmissionStatus::AwaitingServer;
        if ui
            .add_enabled(!awaiting, egui::Button::new("Generate timetables"))
            .clicked()
        {
            actions.push(UiAction::Submit);
        }

        if let Some(err) = view.validation {
            ui.colored_label(
                egui::Color32::from_rgb(220, 90, 90),
                format!("Please choose a degree, a campus and courses ({err})."),
            );
        }

        if let Some(indicator) = &view.indicator {
            ui.horizontal(|ui| {
                if indicator.busy {
                    ui.spinner();
                }
                let color = match view.status {
                    SubmissionStatus::Failed => egui::Color32::from_rgb(220, 90, 90),
                    SubmissionStatus::Succeeded => egui::Color32::from_rgb(90, 180, 110),
                    _ => ui.visuals().text_color(),
                };
                ui.colored_label(color, &indicator.text);
            });
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        // Every frame redraws from a fresh view; nothing is patched incrementally.
        let view = self.session.view();
        let mut actions = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(&self.server_url);
                ui.separator();
                ui.weak(&self.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            if let Some(notice) = &view.notice {
                ui.colored_label(egui::Color32::from_rgb(230, 180, 80), notice);
            }
            Self::show_degrees(ui, &view, &mut actions);
            ui.separator();
            Self::show_campus(ui, &view, &mut actions);
            ui.separator();
            self.show_courses(ui, &view, &mut actions);
            ui.separator();
            Self::show_chips(ui, &view, &mut actions);
            ui.separator();
            Self::show_submit(ui, &view, &mut actions);
        });

        self.apply_actions(actions);

        let busy = view.campuses_loading
            || view.courses_loading
            || view.status == SubmissionStatus::AwaitingServer;
        if busy {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
