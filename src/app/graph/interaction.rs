use eframe::egui::{self, Pos2, Rect, Ui};

use crate::view::GraphViewHandle;
use crate::viewport::interaction::NavigationRequest;

use super::super::ViewModel;

/// What a frame of pointer input asked for beyond moving the camera or nodes.
#[derive(Default)]
pub(in crate::app) struct CanvasInput {
    pub(in crate::app) navigate: Option<NavigationRequest>,
    pub(in crate::app) toggle_fullscreen: bool,
}

fn local(rect: Rect, pointer: Pos2) -> Pos2 {
    (pointer - rect.min).to_pos2()
}

impl ViewModel {
    pub(in crate::app) fn handle_canvas_input(
        handle: &mut GraphViewHandle,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> CanvasInput {
        let mut input = CanvasInput::default();

        let hover_pos = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer));
        handle.hover(hover_pos.map(|pointer| local(rect, pointer)));

        Self::handle_canvas_zoom(handle, ui, rect, response);

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
        {
            handle.press(local(rect, origin));
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if handle.dragged().is_some() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    handle.drag_to(local(rect, pointer));
                }
            } else {
                handle.pan_by(response.drag_delta());
            }
        } else if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            handle.pan_by(response.drag_delta());
        }

        if response.drag_stopped() {
            input.navigate = handle.release();
        }

        let pointer_local = response
            .interact_pointer_pos()
            .map(|pointer| local(rect, pointer));
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = pointer_local
        {
            input.navigate = input.navigate.or_else(|| handle.click(pointer));
        }

        if response.double_clicked()
            && let Some(pointer) = pointer_local
            && handle.node_at(pointer).is_none()
        {
            input.toggle_fullscreen = true;
        }

        let over_node = hover_pos.is_some() && handle.hovered().is_some();
        if handle.dragged().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if over_node {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        input
    }

    fn handle_canvas_zoom(
        handle: &mut GraphViewHandle,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let pointer = local(rect, pointer);

        let (pinch, scroll) = ui.input(|input| (input.zoom_delta(), input.raw_scroll_delta.y));
        if (pinch - 1.0).abs() > f32::EPSILON {
            handle.pinch(pointer, pinch);
        } else if scroll.abs() > f32::EPSILON {
            handle.wheel(pointer, scroll);
        }
    }
}
