mod form;

pub use form::{FormPage, FormPageProps, render_form_page};
