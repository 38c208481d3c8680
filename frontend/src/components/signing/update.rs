//! Update function for the signing page.

use common::error::SigningError;
use common::requests::CompleteZoneRequest;
use common::signing::{Phase, ScrollMetrics, SigningFlow};
use gloo_console::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::helpers::show_toast;

use super::messages::Msg;
use super::state::{ServerReceipt, SigningComponent};

pub fn update(component: &mut SigningComponent, ctx: &Context<SigningComponent>, msg: Msg) -> bool {
    let session_id = ctx.props().session_id.clone();
    match msg {
        Msg::Loaded(Ok(bundle)) => {
            match SigningFlow::resume(bundle.template, bundle.session, bundle.zone_data) {
                Ok(flow) => component.flow = Some(flow),
                Err(e) => component.load_error = Some(e.to_string()),
            }
            component.refresh_text_value();
            true
        }
        Msg::Loaded(Err(e)) => {
            component.load_error = Some(e);
            true
        }
        Msg::Start => {
            let Some(flow) = component.flow.as_mut() else {
                return false;
            };
            match flow.open_document() {
                Ok(first_view) => {
                    if first_view {
                        let link = ctx.link().clone();
                        spawn_local(async move {
                            let result = api::mark_viewed(&session_id).await;
                            link.send_message(Msg::Viewed(result));
                        });
                    }
                    schedule_scroll_check(ctx);
                    true
                }
                Err(e) => {
                    show_toast(&e.to_string());
                    false
                }
            }
        }
        Msg::Viewed(result) => {
            if let Err(e) = result {
                warn!(format!("session {} not marked as viewed: {}", session_id, e));
            }
            false
        }
        Msg::Scrolled(metrics) => match component.flow.as_mut() {
            Some(flow) => {
                let before = flow.has_scrolled_to_bottom();
                flow.report_scroll(metrics) != before
            }
            None => false,
        },
        Msg::CheckScroll => {
            let (Some(flow), Some(element)) =
                (component.flow.as_mut(), component.preview_ref.cast::<web_sys::Element>())
            else {
                return false;
            };
            // Every page renders as one child of the preview
            flow.set_mounted_pages(element.child_element_count());
            if flow.preview_complete() {
                ctx.link().send_message(Msg::Scrolled(ScrollMetrics {
                    scroll_top: element.scroll_top() as f64,
                    client_height: element.client_height() as f64,
                    scroll_height: element.scroll_height() as f64,
                }));
            } else if flow.phase() == Phase::Preview && flow.page_count().is_some() {
                // Pages are still being added; the page count message re-checks otherwise
                schedule_scroll_check(ctx);
            }
            false
        }
        Msg::PageCount(count) => match component.flow.as_mut() {
            Some(flow) => {
                let changed = flow.page_count() != Some(count);
                flow.set_page_count(count);
                schedule_scroll_check(ctx);
                changed
            }
            None => false,
        },
        Msg::Proceed => {
            let Some(flow) = component.flow.as_mut() else {
                return false;
            };
            match flow.proceed_to_signing() {
                Ok(()) => {
                    component.refresh_text_value();
                    true
                }
                Err(SigningError::DocumentNotRead) => {
                    show_toast("Veuillez lire le document jusqu'à la fin.");
                    false
                }
                Err(e) => {
                    show_toast(&e.to_string());
                    false
                }
            }
        }
        Msg::Review => {
            if let Some(flow) = component.flow.as_mut() {
                if flow.review_document().is_ok() {
                    schedule_scroll_check(ctx);
                    return true;
                }
            }
            false
        }
        Msg::SelectZone(index) => move_focus(component, |flow| flow.select_zone(index)),
        Msg::NextZone => move_focus(component, SigningFlow::next_zone),
        Msg::PreviousZone => move_focus(component, SigningFlow::previous_zone),
        Msg::TextChanged(value) => {
            component.text_value = value;
            true
        }
        Msg::SubmitZone(input) => {
            if component.busy {
                return false;
            }
            let Some(zone) = component.flow.as_ref().and_then(|f| f.current_zone()).cloned() else {
                return false;
            };
            // Same check the server runs, for immediate feedback
            if let Err(e) = input.clone().into_value(&zone) {
                show_toast(&describe(&e));
                return false;
            }
            component.busy = true;
            let link = ctx.link().clone();
            let request = CompleteZoneRequest {
                zone_id: zone.id.clone(),
                input: input.clone(),
            };
            spawn_local(async move {
                let result = api::complete_zone(&session_id, &request).await;
                link.send_message(Msg::ZoneStored {
                    zone_id: request.zone_id,
                    input,
                    result,
                });
            });
            true
        }
        Msg::ZoneStored { zone_id, input, result } => {
            component.busy = false;
            let Some(flow) = component.flow.as_mut() else {
                return true;
            };
            let applied = result.and_then(|_| {
                flow.complete_zone(&zone_id, input)
                    .map_err(|e| describe(&e))
            });
            match applied {
                Ok(_) => {
                    if flow.remaining_count() == 0 {
                        show_toast("Toutes les zones sont complétées. Vous pouvez finaliser.");
                    }
                    component.refresh_text_value();
                }
                Err(e) => show_toast(&e),
            }
            true
        }
        Msg::Finalize => {
            if component.busy {
                return false;
            }
            match component.flow.as_ref() {
                Some(flow) if flow.can_finalize() => {}
                Some(flow) => {
                    show_toast(&format!("Il reste {} zone(s) à compléter.", flow.remaining_count()));
                    return false;
                }
                None => return false,
            }
            component.busy = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::finalize(&session_id).await;
                link.send_message(Msg::Finalized(result));
            });
            true
        }
        Msg::Finalized(result) => {
            component.busy = false;
            let Some(flow) = component.flow.as_mut() else {
                return true;
            };
            match result {
                Ok(record) => {
                    let mut receipt = ServerReceipt { confirmed: &record };
                    match flow.finalize(record.signed_at, record.signer_ip.clone(), &mut receipt) {
                        Ok(_) => component.receipt = Some(record),
                        Err(e) => show_toast(&describe(&e)),
                    }
                }
                Err(e) => show_toast(&format!("La signature n'a pas pu être finalisée : {}", e)),
            }
            true
        }
    }
}

fn move_focus(component: &mut SigningComponent, step: impl FnOnce(&mut SigningFlow) -> bool) -> bool {
    let moved = component.flow.as_mut().is_some_and(step);
    if moved {
        component.refresh_text_value();
    }
    moved
}

/// Pages load asynchronously; the scroll height is only final afterwards.
fn schedule_scroll_check(ctx: &Context<SigningComponent>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(300).await;
        link.send_message(Msg::CheckScroll);
    });
}

fn describe(error: &SigningError) -> String {
    match error {
        SigningError::EmptyValue(_) => "Cette zone doit être remplie.".to_string(),
        SigningError::InputMismatch { expected, .. } => format!("Saisie attendue : {}", expected),
        SigningError::ZoneAlreadyCompleted(_) => "Cette zone est déjà complétée.".to_string(),
        other => other.to_string(),
    }
}
