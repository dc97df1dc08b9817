use crate::constants::*;
use crate::dom;
use snowglobe_core::{GiftItem, Theme};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Reflect the theme on the page: body marker, switch state and its label.
pub fn apply_theme(document: &web::Document, theme: Theme) {
    if let Some(body) = document.body() {
        dom::set_class(&body, BODY_LIT_CLASS, theme.is_lit());
    }
    if let Some(el) = document.get_element_by_id(TOGGLE_ID) {
        dom::set_class(&el, TOGGLE_LIT_CLASS, theme.is_lit());
    }
    if let Some(el) = document.get_element_by_id(TOGGLE_LABEL_ID) {
        el.set_text_content(Some(theme.label()));
    }
}

/// Position a gift box and mark it open or closed.
pub fn apply_gift(document: &web::Document, gift: &GiftItem) {
    let Some(el) = document.get_element_by_id(&gift_element_id(gift.id)) else {
        return;
    };
    dom::set_class(&el, GIFT_OPEN_CLASS, gift.is_open);
    if let Ok(html) = el.dyn_into::<web::HtmlElement>() {
        let style = html.style();
        _ = style.set_property("transform", &gift.transform_css());
        _ = style.set_property("z-index", &gift.z_index().to_string());
        let palette = gift.style();
        _ = style.set_property("--gift-box", palette.box_color);
        _ = style.set_property("--gift-ribbon", palette.ribbon);
        _ = style.set_property("--gift-border", palette.border);
        _ = html.set_attribute("title", gift.icon.name());
    }
}
