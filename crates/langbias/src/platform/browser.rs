//! Browser platform: `IntersectionObserver`-backed source and the zoon
//! renderer for the page tree.

pub mod observer;
pub mod renderer;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[cfg(all(test, target_arch = "wasm32"))]
fn test_element(tag: &str) -> web_sys::Element {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.create_element(tag).ok())
        .unwrap()
}
