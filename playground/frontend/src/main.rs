use langbias::platform::browser::renderer::PageRenderer;
use langbias::zoon::{eprintln, println, *};
use langbias::{Page, PageConfig};

fn main() {
    start_app("app", root);
}

fn root() -> impl Element {
    let config = PageConfig::default();
    match langbias::content::validate() {
        Ok(()) => println!("content ok, mounting page"),
        Err(error) => eprintln!("{error}: {:?}", error.issues),
    }
    PageRenderer::new(Page::new(config)).root()
}
