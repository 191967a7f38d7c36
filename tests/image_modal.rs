//! Image modal tests: URL/file tabs, dimension probes, aspect-ratio lock
//! and the asynchronous file read

mod common;

use std::path::PathBuf;

use common::{html, place_caret, test_model};

use inkpad::commands::{Cmd, ImageSource, RequestId};
use inkpad::editable::DimensionLock;
use inkpad::messages::{FileMsg, ModalMsg, Msg};
use inkpad::model::{AppModel, ImageModal, ImageTab, ModalState};
use inkpad::update::update;

fn modal(model: &mut AppModel, msg: ModalMsg) -> Option<Cmd> {
    update(model, Msg::Modal(msg))
}

fn image(model: &AppModel) -> &ImageModal {
    match &model.ui.active_modal {
        Some(ModalState::Image(image)) => image,
        other => panic!("expected image modal, got {:?}", other),
    }
}

/// Open the modal with a URL and answer its probe
fn probed_model(width: u32, height: u32) -> AppModel {
    let mut model = test_model("Hello", 500);
    place_caret(&mut model, 5);
    modal(&mut model, ModalMsg::OpenImage);
    modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/x.png".into()),
    );
    let request = image(&model).probe.expect("probe requested");
    modal(
        &mut model,
        ModalMsg::ImageProbed {
            request,
            dimensions: Some((width, height)),
        },
    );
    model
}

// ========================================================================
// Probing
// ========================================================================

#[test]
fn test_valid_url_requests_probe() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);

    let cmd = modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/x.png".into()),
    );

    match cmd {
        Some(Cmd::ProbeImage { request, source }) => {
            assert_eq!(image(&model).probe, Some(request));
            assert_eq!(source, ImageSource::Url("https://example.com/x.png".into()));
        }
        other => panic!("expected probe, got {:?}", other),
    }
}

#[test]
fn test_invalid_url_cancels_probe() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);
    modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/x.png".into()),
    );

    let cmd = modal(&mut model, ModalMsg::SetImageUrl("not a url".into()));

    assert!(matches!(cmd, Some(Cmd::Redraw)));
    assert_eq!(image(&model).probe, None);
}

#[test]
fn test_probe_fills_natural_size() {
    let model = probed_model(400, 300);
    let dims = image(&model).dims;
    assert_eq!(dims.natural(), Some((400, 300)));
    assert_eq!(dims.width(), Some(400));
    assert_eq!(dims.height(), Some(300));
    assert_eq!(image(&model).probe, None);
}

#[test]
fn test_stale_probe_ignored() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);
    modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/x.png".into()),
    );

    let cmd = modal(
        &mut model,
        ModalMsg::ImageProbed {
            request: RequestId(9999),
            dimensions: Some((10, 10)),
        },
    );

    assert!(cmd.is_none());
    assert_eq!(image(&model).dims.natural(), None);
}

#[test]
fn test_failed_probe_leaves_size_unknown() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);
    modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/x.png".into()),
    );
    let request = image(&model).probe.unwrap();

    modal(
        &mut model,
        ModalMsg::ImageProbed {
            request,
            dimensions: None,
        },
    );

    assert_eq!(image(&model).dims, DimensionLock::default());
}

// ========================================================================
// Aspect-ratio lock
// ========================================================================

#[test]
fn test_locked_width_sets_height() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::SetImageWidth("200".into()));
    assert_eq!(image(&model).dims.height(), Some(150));

    modal(&mut model, ModalMsg::SetImageHeight("150".into()));
    assert_eq!(image(&model).dims.width(), Some(200));
}

#[test]
fn test_rounding_round_trip_stays_close() {
    let mut model = probed_model(333, 217);
    modal(&mut model, ModalMsg::SetImageWidth("100".into()));
    let height = image(&model).dims.height().unwrap();
    assert_eq!(height, 65);

    modal(&mut model, ModalMsg::SetImageHeight(height.to_string()));
    let width = image(&model).dims.width().unwrap();
    assert!((i64::from(width) - 100).abs() <= 1);
}

#[test]
fn test_unlocked_fields_are_independent() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::ToggleAspectLock);
    modal(&mut model, ModalMsg::SetImageWidth("50".into()));
    modal(&mut model, ModalMsg::SetImageHeight("50".into()));
    let dims = image(&model).dims;
    assert_eq!((dims.width(), dims.height()), (Some(50), Some(50)));
}

#[test]
fn test_lock_toggle_survives_new_source() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::ToggleAspectLock);
    assert!(!image(&model).dims.locked);

    modal(
        &mut model,
        ModalMsg::SetImageUrl("https://example.com/other.png".into()),
    );
    assert!(!image(&model).dims.locked);
    assert_eq!(image(&model).dims.natural(), None);

    modal(
        &mut model,
        ModalMsg::ImageFileChosen(Some(PathBuf::from("/tmp/photo.png"))),
    );
    let request = image(&model).probe.expect("probe requested");
    modal(
        &mut model,
        ModalMsg::ImageProbed {
            request,
            dimensions: Some((200, 100)),
        },
    );
    modal(&mut model, ModalMsg::SetImageWidth("50".into()));
    let dims = image(&model).dims;
    assert!(!dims.locked);
    assert_eq!((dims.width(), dims.height()), (Some(50), Some(100)));
}

#[test]
fn test_reset_restores_natural_size() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::SetImageWidth("40".into()));
    modal(&mut model, ModalMsg::ResetImageSize);
    let dims = image(&model).dims;
    assert_eq!((dims.width(), dims.height()), (Some(400), Some(300)));
}

#[test]
fn test_confirm_writes_dimensions() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::SetImageWidth("200".into()));
    modal(&mut model, ModalMsg::Confirm);

    assert_eq!(
        html(&model),
        "Hello<img src=\"https://example.com/x.png\" alt=\"Image\" width=\"200\" height=\"150\">"
    );
}

#[test]
fn test_cleared_field_is_omitted() {
    let mut model = probed_model(400, 300);
    modal(&mut model, ModalMsg::ToggleAspectLock);
    modal(&mut model, ModalMsg::SetImageHeight("".into()));
    modal(&mut model, ModalMsg::Confirm);

    assert_eq!(
        html(&model),
        "Hello<img src=\"https://example.com/x.png\" alt=\"Image\" width=\"400\">"
    );
}

// ========================================================================
// File tab
// ========================================================================

fn chosen_file_model() -> AppModel {
    let mut model = test_model("Hello", 500);
    place_caret(&mut model, 2);
    modal(&mut model, ModalMsg::OpenImage);
    modal(&mut model, ModalMsg::SelectImageTab(ImageTab::File));
    modal(
        &mut model,
        ModalMsg::ImageFileChosen(Some(PathBuf::from("cat.png"))),
    );
    model
}

#[test]
fn test_file_tab_needs_a_file() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);
    modal(&mut model, ModalMsg::SelectImageTab(ImageTab::File));
    assert!(modal(&mut model, ModalMsg::Confirm).is_none());
    assert!(model.ui.has_modal());
}

#[test]
fn test_cancelled_file_choice_keeps_modal() {
    let mut model = test_model("Hello", 500);
    modal(&mut model, ModalMsg::OpenImage);
    assert!(modal(&mut model, ModalMsg::ImageFileChosen(None)).is_none());
    assert_eq!(image(&model).tab, ImageTab::Url);
}

#[test]
fn test_chosen_file_is_probed() {
    let model = chosen_file_model();
    let image = image(&model);
    assert_eq!(image.tab, ImageTab::File);
    assert_eq!(image.file, Some(PathBuf::from("cat.png")));
    assert!(image.probe.is_some());
}

#[test]
fn test_file_confirm_reads_then_inserts() {
    let mut model = chosen_file_model();

    let request = match modal(&mut model, ModalMsg::Confirm) {
        Some(Cmd::ReadImageFile { request, path }) => {
            assert_eq!(path, PathBuf::from("cat.png"));
            request
        }
        other => panic!("expected file read, got {:?}", other),
    };
    assert!(!model.ui.has_modal());
    assert_eq!(html(&model), "Hello");

    update(
        &mut model,
        Msg::File(FileMsg::ImageLoaded {
            request,
            result: Ok("data:image/png;base64,AAAA".into()),
        }),
    );

    assert_eq!(
        html(&model),
        "He<img src=\"data:image/png;base64,AAAA\" alt=\"Uploaded image\">llo"
    );
    assert!(model.pending_image.is_none());
}

#[test]
fn test_failed_file_read_inserts_nothing() {
    let mut model = chosen_file_model();
    let request = match modal(&mut model, ModalMsg::Confirm) {
        Some(Cmd::ReadImageFile { request, .. }) => request,
        other => panic!("expected file read, got {:?}", other),
    };

    update(
        &mut model,
        Msg::File(FileMsg::ImageLoaded {
            request,
            result: Err("permission denied".into()),
        }),
    );

    assert_eq!(html(&model), "Hello");
    assert_eq!(
        model.ui.notifications.back().map(String::as_str),
        Some("Could not read the image file.")
    );
}

#[test]
fn test_stale_file_read_ignored() {
    let mut model = chosen_file_model();
    modal(&mut model, ModalMsg::Confirm);

    update(
        &mut model,
        Msg::File(FileMsg::ImageLoaded {
            request: RequestId(9999),
            result: Ok("data:image/png;base64,AAAA".into()),
        }),
    );

    assert_eq!(html(&model), "Hello");
    assert!(model.pending_image.is_some());
}
