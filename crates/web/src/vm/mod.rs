mod form_vm;

pub use form_vm::{
    CategoryVm, FormPageVm, MarkOptionVm, MarkRowVm, QuestionVm, form_path, map_form_page,
};
