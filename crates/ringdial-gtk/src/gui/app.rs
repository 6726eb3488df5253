use crate::events::AppEvent;
use crate::gui::CONTAINER_SPACING;
use crate::gui::scene::SceneRenderer;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use anyhow::Context;
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringdial::config;
use ringdial::controller::{InteractionController, PointerDevice, PointerEvent, PointerId};
use ringdial::stage::{Container, ContainerId, Stage};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct AppModel {
    pub stage: Rc<RefCell<Stage>>,
    pub scene: Rc<RefCell<SceneRenderer>>,
    pub controller: InteractionController,
    pub config_path: Option<PathBuf>,
    pub surfaces: Vec<(ContainerId, gtk::DrawingArea)>,
    pub containers_box: gtk::Box,
}

#[derive(Debug)]
pub enum AppMsg {
    Press {
        container: ContainerId,
        event: PointerEvent,
    },
    Motion(PointerEvent),
    Release(PointerEvent),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Option<PathBuf>, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Ringdial"),
            set_default_size: (680, 480),

            gtk::ScrolledWindow {
                set_hscrollbar_policy: gtk::PolicyType::Never,

                #[name = "containers_box"]
                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: CONTAINER_SPACING,
                    set_margin_all: CONTAINER_SPACING,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config_path, rx) = init;

        theme::load_css();

        let (stage, scene) = load_stage(config_path.as_deref()).unwrap_or_else(|e| {
            log::error!("{:#}", e);
            (Stage::new(), SceneRenderer::default())
        });

        let mut model = AppModel {
            stage: Rc::new(RefCell::new(stage)),
            scene: Rc::new(RefCell::new(scene)),
            controller: InteractionController::new(),
            config_path,
            surfaces: Vec::new(),
            containers_box: gtk::Box::default(),
        };

        let widgets = view_output!();

        model.containers_box = widgets.containers_box.clone();
        model.rebuild_surfaces(&sender);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Press { container, event } => {
                let outcome = self.controller.on_press(
                    &mut self.stage.borrow_mut(),
                    &mut *self.scene.borrow_mut(),
                    &container,
                    event,
                );
                log::debug!("Press in {}: {:?}", container, outcome);
                self.queue_draw(&container);
            }
            AppMsg::Motion(event) => {
                let Some(container) = self.controller.session().map(|s| s.container.clone())
                else {
                    return;
                };
                let update = self.controller.on_move(
                    &mut self.stage.borrow_mut(),
                    &mut *self.scene.borrow_mut(),
                    event,
                );
                if update.is_some() {
                    self.queue_draw(&container);
                }
            }
            AppMsg::Release(event) => {
                self.controller
                    .on_release(&mut self.stage.borrow_mut(), event);
            }
            AppMsg::ConfigReload => {
                let (stage, scene) = match load_stage(self.config_path.as_deref()) {
                    Ok(loaded) => loaded,
                    Err(e) => {
                        log::error!("Keeping previous configuration: {:#}", e);
                        return;
                    }
                };
                *self.stage.borrow_mut() = stage;
                *self.scene.borrow_mut() = scene;
                // rings were rebuilt, any session points at stale ids
                self.controller = InteractionController::new();
                self.rebuild_surfaces(&sender);
                log::info!("Configuration reloaded");
            }
        }
    }
}

impl AppModel {
    fn queue_draw(&self, container: &ContainerId) {
        self.surfaces
            .iter()
            .filter(|(id, _)| id == container)
            .for_each(|(_, area)| area.queue_draw());
    }

    fn rebuild_surfaces(&mut self, sender: &ComponentSender<Self>) {
        while let Some(child) = self.containers_box.first_child() {
            self.containers_box.remove(&child);
        }

        let containers: Vec<Container> = self.stage.borrow().containers().to_vec();
        self.surfaces = containers
            .iter()
            .map(|container| {
                let area = self.build_surface(container, sender);
                self.containers_box.append(&area);
                (container.id().clone(), area)
            })
            .collect();
    }

    fn build_surface(
        &self,
        container: &Container,
        sender: &ComponentSender<Self>,
    ) -> gtk::DrawingArea {
        let area = gtk::DrawingArea::new();
        area.add_css_class("ringdial-surface");
        area.set_content_width((container.sidebar_width() + container.size()) as i32);
        area.set_content_height(container.size() as i32);
        area.set_halign(gtk::Align::Start);

        let stage = self.stage.clone();
        let scene = self.scene.clone();
        let id = container.id().clone();
        area.set_draw_func(move |drawing_area, cr, _, _| {
            let style_context = drawing_area.style_context();
            let colors = ThemeColors::from_context(&style_context);
            let stage = stage.borrow();
            let Some(container) = stage.container(&id) else {
                return;
            };
            if let Err(e) = view::draw(cr, &stage, &scene.borrow(), container, &colors) {
                log::error!("Drawing error: {}", e);
            }
        });

        // pointer positions arrive relative to the whole area, the rings
        // start after the label column
        let offset = container.sidebar_width();
        let drag = gtk::GestureDrag::new();
        {
            let sender = sender.clone();
            let id = container.id().clone();
            drag.connect_drag_begin(move |gesture, x, y| {
                sender.input(AppMsg::Press {
                    container: id.clone(),
                    event: PointerEvent::new(pointer_of(gesture), x - offset, y),
                });
            });
        }
        {
            let sender = sender.clone();
            drag.connect_drag_update(move |gesture, dx, dy| {
                if let Some((x, y)) = gesture.start_point() {
                    sender.input(AppMsg::Motion(PointerEvent::new(
                        pointer_of(gesture),
                        x + dx - offset,
                        y + dy,
                    )));
                }
            });
        }
        {
            let sender = sender.clone();
            drag.connect_drag_end(move |gesture, dx, dy| {
                let (x, y) = gesture.start_point().unwrap_or_default();
                sender.input(AppMsg::Release(PointerEvent::new(
                    pointer_of(gesture),
                    x + dx - offset,
                    y + dy,
                )));
            });
        }
        area.add_controller(drag);

        area
    }
}

fn pointer_of(gesture: &gtk::GestureDrag) -> PointerId {
    let device = match gesture.device().map(|d| d.source()) {
        Some(gdk::InputSource::Touchscreen) => PointerDevice::Touch,
        _ => PointerDevice::Mouse,
    };
    PointerId { device, id: 0 }
}

fn load_stage(config_path: Option<&Path>) -> anyhow::Result<(Stage, SceneRenderer)> {
    let config = config::load_or_default(config_path);
    let mut scene = SceneRenderer::default();
    let (stage, skipped) =
        Stage::from_config(&config, &mut scene).context("Invalid configuration")?;
    if !skipped.is_empty() {
        log::warn!("{} slider(s) skipped", skipped.len());
    }
    Ok((stage, scene))
}
