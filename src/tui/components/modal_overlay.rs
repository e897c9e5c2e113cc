//! Modal overlay component
//!
//! Full-screen absolute layer that centers its children over the view.

use iocraft::prelude::*;

/// Backdrop color behind modals
pub const MODAL_BACKDROP: Color = Color::Rgb {
    r: 30,
    g: 30,
    b: 30,
};

#[derive(Default, Props)]
pub struct ModalOverlayProps<'a> {
    /// Paint a solid backdrop over the content behind the modal
    pub show_backdrop: bool,
    pub children: Vec<AnyElement<'a>>,
}

#[component]
pub fn ModalOverlay<'a>(props: &mut ModalOverlayProps<'a>) -> impl Into<AnyElement<'a>> {
    element! {
        View(
            width: 100pct,
            height: 100pct,
            position: Position::Absolute,
            top: 0,
            left: 0,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            background_color: if props.show_backdrop { Some(MODAL_BACKDROP) } else { None },
        ) {
            #(std::mem::take(&mut props.children))
        }
    }
}
