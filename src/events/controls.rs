use crate::audio::{MelodyPlayer, SharedAudio};
use crate::chrome;
use crate::constants::{gift_element_id, TOGGLE_ID};
use crate::dom;
use snowglobe_core::theme::ThemeCell;
use snowglobe_core::{on_gift_click, Gifts};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub fn wire_theme_toggle(
    document: &web::Document,
    theme: ThemeCell,
    melody: Rc<RefCell<MelodyPlayer>>,
) {
    let doc = document.clone();
    dom::add_click_listener(document, TOGGLE_ID, move |_| {
        let next = melody.borrow_mut().toggle_theme(&theme);
        chrome::apply_theme(&doc, next);
    });
}

pub fn wire_gifts(document: &web::Document, gifts: Rc<RefCell<Gifts>>, audio: SharedAudio) {
    let ids: Vec<&'static str> = gifts.borrow().items().iter().map(|g| g.id).collect();
    for id in ids {
        if let Some(gift) = gifts.borrow().get(id) {
            chrome::apply_gift(document, gift);
        }
        let doc = document.clone();
        let gifts = gifts.clone();
        let audio = audio.clone();
        dom::add_click_listener(document, &gift_element_id(id), move |_| {
            let mut gifts = gifts.borrow_mut();
            on_gift_click(&mut gifts, &mut *audio.borrow_mut(), id);
            if let Some(gift) = gifts.get(id) {
                chrome::apply_gift(&doc, gift);
            }
        });
    }
}
