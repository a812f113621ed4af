//! End-to-end behavior of the client façade: message dispatch, identity
//! reconciliation, the edit-lock protocol driven through the rendering
//! surface, form submission, liveness pruning, and plot lifecycle.

use opdeck_client::{Client, ServerMessage, Widget, WidgetKind};
use opdeck_core::{ElementId, InputEvent, NullMarkerFactory, Surface, Value};
use opdeck_plot::{
    AxisSpec, Color, LineStyle, PlotExtents, PlotSurface, Point, PolygonDescription, Range, Side,
};

fn client() -> Client {
    Client::new(Box::new(NullMarkerFactory))
}

/// Scripted immediate-mode surface: clicks and keystrokes queued before a
/// frame are consumed by the widgets that match them, and everything shown
/// is recorded for assertions.
#[derive(Default)]
struct TestSurface {
    clicks: Vec<String>,
    type_text: Option<String>,
    submit: bool,
    toggle_checkbox: bool,
    select_combo: Option<String>,
    texts: Vec<String>,
    shown_text: Vec<String>,
    shown_ints: Vec<i64>,
    combo_items: Vec<Vec<String>>,
}

impl TestSurface {
    fn clicking(label: &str) -> Self {
        Self {
            clicks: vec![label.to_owned()],
            ..Self::default()
        }
    }
}

impl Surface for TestSurface {
    fn text(&mut self, text: &str) {
        self.texts.push(text.to_owned());
    }

    fn bold_text(&mut self, text: &str) {
        self.texts.push(text.to_owned());
    }

    fn same_line(&mut self) {}

    fn separator(&mut self) {}

    fn indent(&mut self) {}

    fn unindent(&mut self) {}

    fn collapsing_header(&mut self, _key: &str, _label: &str) -> bool {
        true
    }

    fn button(&mut self, _key: &str, label: &str) -> bool {
        if let Some(pos) = self.clicks.iter().position(|wanted| wanted == label) {
            self.clicks.remove(pos);
            true
        } else {
            false
        }
    }

    fn checkbox(&mut self, _key: &str, value: &mut bool) -> bool {
        if self.toggle_checkbox {
            self.toggle_checkbox = false;
            *value = !*value;
            true
        } else {
            false
        }
    }

    fn input_int(&mut self, _key: &str, value: &mut i64, _editable: bool) -> InputEvent {
        self.shown_ints.push(*value);
        InputEvent::IDLE
    }

    fn input_number(&mut self, _key: &str, _value: &mut f64, _editable: bool) -> InputEvent {
        InputEvent::IDLE
    }

    fn input_text(&mut self, _key: &str, value: &mut String, editable: bool) -> InputEvent {
        let mut event = InputEvent::IDLE;
        if editable {
            if let Some(typed) = self.type_text.take() {
                *value = typed;
                event.changed = true;
            }
            if self.submit {
                event.done = true;
            }
        }
        self.shown_text.push(value.clone());
        event
    }

    fn slider_number(&mut self, _key: &str, _value: &mut f64, _min: f64, _max: f64) -> bool {
        false
    }

    fn combo(&mut self, _key: &str, _current: Option<&str>, items: &[String]) -> Option<usize> {
        self.combo_items.push(items.to_vec());
        if let Some(wanted) = &self.select_combo {
            let found = items.iter().position(|item| item == wanted);
            if found.is_some() {
                self.select_combo = None;
            }
            return found;
        }
        None
    }

    fn columns_row(&mut self, _key: &str, _cells: &[String]) {}

    fn table(&mut self, _key: &str, _header: &[String], _rows: &[Vec<String>]) {}

    fn tooltip(&mut self, _text: &str) {}
}

#[derive(Default)]
struct CountingPlotSurface {
    plots: usize,
    lines: usize,
    polygons: usize,
}

impl PlotSurface for CountingPlotSurface {
    fn begin_plot(
        &mut self,
        _key: &str,
        _title: &str,
        _x: AxisSpec<'_>,
        _y_left: AxisSpec<'_>,
        _y_right: AxisSpec<'_>,
    ) -> bool {
        self.plots += 1;
        true
    }

    fn line(
        &mut self,
        _label: &str,
        _color: Color,
        _style: LineStyle,
        _side: Side,
        _points: &[Point],
    ) {
        self.lines += 1;
    }

    fn polygon(&mut self, _label: &str, _side: Side, _polygon: &PolygonDescription) {
        self.polygons += 1;
    }

    fn end_plot(&mut self) -> PlotExtents {
        PlotExtents::default()
    }
}

fn string_input(id: &ElementId, data: &str) -> ServerMessage {
    ServerMessage::StringInput {
        id: id.clone(),
        data: data.to_owned(),
    }
}

#[test]
fn identity_stability_preserves_in_flight_edits() {
    let mut client = client();
    let id = ElementId::new(["Robot"], "posture");
    client.apply(string_input(&id, "V0"));

    let mut surface = TestSurface::clicking("Edit");
    client.draw(&mut surface);

    // Same (path, name, kind): the same instance is updated in place, so
    // the edit session survives the update.
    client.apply(string_input(&id, "V1"));
    let mut surface = TestSurface::default();
    client.draw(&mut surface);
    assert_eq!(surface.shown_text, vec!["V0".to_owned()]);
}

#[test]
fn kind_change_replaces_the_widget_wholesale() {
    let mut client = client();
    let id = ElementId::new(["Robot"], "value");
    client.apply(string_input(&id, "V0"));
    let mut surface = TestSurface::clicking("Edit");
    client.draw(&mut surface);

    client.apply(ServerMessage::IntegerInput {
        id: id.clone(),
        data: 7,
    });
    match client.widget(&id) {
        Some(widget) => assert_eq!(widget.kind(), WidgetKind::IntegerInput),
        None => panic!("widget must exist after the kind change"),
    }

    // Fresh instance: no edit session, no residual string state.
    let mut surface = TestSurface::default();
    client.draw(&mut surface);
    assert_eq!(surface.shown_ints, vec![7]);
    assert!(surface.shown_text.is_empty());
}

#[test]
fn edits_win_over_concurrent_authority_updates() {
    let mut client = client();
    let id = ElementId::new(["Robot"], "posture");
    client.apply(string_input(&id, "V0"));

    let mut surface = TestSurface::clicking("Edit");
    client.draw(&mut surface);

    // The authority races the edit; the draft must not move.
    client.apply(string_input(&id, "V1"));
    let mut surface = TestSurface::default();
    client.draw(&mut surface);
    assert_eq!(surface.shown_text, vec!["V0".to_owned()]);

    // Type V2 and confirm: exactly one commit, carrying V2.
    let mut surface = TestSurface {
        type_text: Some("V2".to_owned()),
        submit: true,
        ..TestSurface::default()
    };
    client.draw(&mut surface);
    let requests = client.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, id);
    assert_eq!(requests[0].value, Value::String("V2".to_owned()));

    // Subsequent state is V2, not the raced V1.
    let mut surface = TestSurface::default();
    client.draw(&mut surface);
    assert_eq!(surface.shown_text, vec!["V2".to_owned()]);
}

#[test]
fn unchanged_draft_sends_no_commit() {
    let mut client = client();
    let id = ElementId::new(["Robot"], "posture");
    client.apply(string_input(&id, "V0"));

    let mut surface = TestSurface::clicking("Edit");
    client.draw(&mut surface);
    let mut surface = TestSurface {
        submit: true,
        ..TestSurface::default()
    };
    client.draw(&mut surface);
    assert!(client.drain_requests().is_empty());
}

#[test]
fn checkbox_commits_on_toggle() {
    let mut client = client();
    let id = ElementId::rooted("Enabled");
    client.apply(ServerMessage::Checkbox {
        id: id.clone(),
        state: false,
    });
    let mut surface = TestSurface {
        toggle_checkbox: true,
        ..TestSurface::default()
    };
    client.draw(&mut surface);
    let requests = client.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].value, Value::Bool(true));
}

#[test]
fn unreferenced_widgets_are_pruned_per_batch() {
    let mut client = client();
    let a = ElementId::new(["Robot"], "a");
    let b = ElementId::new(["Robot"], "b");
    client.apply_batch([
        ServerMessage::Label {
            id: a.clone(),
            text: "A".into(),
        },
        ServerMessage::Label {
            id: b.clone(),
            text: "B".into(),
        },
    ]);
    assert!(client.widget(&b).is_some());

    client.apply_batch([ServerMessage::Label {
        id: a.clone(),
        text: "A".into(),
    }]);
    assert!(client.widget(&a).is_some());
    assert!(client.widget(&b).is_none());
}

#[test]
fn empty_categories_disappear_with_their_widgets() {
    let mut client = client();
    let only = ElementId::new(["Tasks", "CoM"], "weight");
    client.apply_batch([ServerMessage::Label {
        id: only.clone(),
        text: "w".into(),
    }]);
    client.apply_batch(Vec::<ServerMessage>::new());
    assert!(client.widget(&only).is_none());
}

#[test]
fn form_declares_nests_and_submits() {
    let mut client = client();
    let fid = ElementId::new(["FSM"], "Interrupt");
    client.apply_batch([
        ServerMessage::Form { id: fid.clone() },
        ServerMessage::FormStringInput {
            form: fid.clone(),
            name: "state".into(),
            required: true,
            default: "Standing".into(),
        },
        ServerMessage::FormObjectBegin {
            name: "gains".into(),
            required: true,
        },
        ServerMessage::FormNumberInput {
            form: fid.clone(),
            name: "p".into(),
            required: true,
            default: 5.0,
        },
        ServerMessage::FormObjectEnd,
    ]);

    let mut surface = TestSurface::clicking("Interrupt");
    client.draw(&mut surface);
    let requests = client.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, fid);

    let map = requests[0].value.as_map().unwrap();
    assert_eq!(map.get("state"), Some(&Value::String("Standing".into())));
    let gains = map.get("gains").unwrap().as_map().unwrap();
    assert_eq!(gains.get("p"), Some(&Value::Number(5.0)));
}

#[test]
fn unready_form_refuses_submission_and_keeps_state() {
    let mut client = client();
    let fid = ElementId::new(["FSM"], "Interrupt");
    client.apply_batch([
        ServerMessage::Form { id: fid.clone() },
        ServerMessage::FormStringInput {
            form: fid.clone(),
            name: "state".into(),
            required: true,
            default: String::new(),
        },
    ]);
    let mut surface = TestSurface::clicking("Interrupt");
    client.draw(&mut surface);
    assert!(client.drain_requests().is_empty());
    // The form is still there, still declarable.
    match client.widget(&fid) {
        Some(Widget::Form(form)) => assert!(!form.ready()),
        _ => panic!("form widget must survive a refused submission"),
    }
}

#[test]
fn data_combo_resolves_reference_lists() {
    let mut client = client();
    let id = ElementId::rooted("robot");
    let mut robots = indexmap::IndexMap::new();
    robots.insert(
        "robots".to_owned(),
        Value::Array(vec!["jvrc1".into(), "ground".into()]),
    );
    client.apply(ServerMessage::Data {
        data: Value::Map(robots),
    });
    client.apply(ServerMessage::DataComboInput {
        id: id.clone(),
        reference: vec!["robots".into()],
        data: String::new(),
    });

    let mut surface = TestSurface {
        select_combo: Some("ground".to_owned()),
        ..TestSurface::default()
    };
    client.draw(&mut surface);
    assert_eq!(
        surface.combo_items,
        vec![vec!["jvrc1".to_owned(), "ground".to_owned()]]
    );
    let requests = client.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].value, Value::String("ground".to_owned()));
}

#[test]
fn plot_lifecycle_retires_but_still_renders() {
    let mut client = client();
    client.apply(ServerMessage::StartPlot {
        id: 1,
        title: "tracking".into(),
    });
    client.apply(ServerMessage::PlotSetupXAxis {
        id: 1,
        label: "t".into(),
        range: Range::UNBOUNDED,
    });
    client.apply(ServerMessage::PlotPoint {
        id: 1,
        dataset: 0,
        label: "error".into(),
        x: 0.0,
        y: 0.1,
        color: Color::WHITE,
        style: LineStyle::Solid,
        side: Side::Left,
    });
    client.apply(ServerMessage::EndPlot { id: 1 });

    // Updates after retirement are dropped silently.
    client.apply(ServerMessage::PlotPoint {
        id: 1,
        dataset: 0,
        label: "error".into(),
        x: 1.0,
        y: 0.2,
        color: Color::WHITE,
        style: LineStyle::Solid,
        side: Side::Left,
    });

    let mut surface = CountingPlotSurface::default();
    client.draw_plots(&mut surface);
    assert_eq!(surface.plots, 1);
    assert_eq!(surface.lines, 1);

    // A fresh start message opens a new active plot alongside the retired one.
    client.apply(ServerMessage::StartPlot {
        id: 1,
        title: "tracking".into(),
    });
    let mut surface = CountingPlotSurface::default();
    client.draw_plots(&mut surface);
    assert_eq!(surface.plots, 2);
}

#[test]
fn messages_carry_over_a_serde_transport() {
    let message = ServerMessage::NumberSlider {
        id: ElementId::new(["Robot"], "speed"),
        data: 0.4,
        min: 0.0,
        max: 1.0,
    };
    let wire = serde_json::to_string(&message).unwrap();
    let back: ServerMessage = serde_json::from_str(&wire).unwrap();
    assert_eq!(back, message);
}

#[test]
#[should_panic(expected = "no active form")]
fn container_declaration_without_a_form_is_fatal() {
    let mut client = client();
    client.apply(ServerMessage::FormObjectBegin {
        name: "gains".into(),
        required: true,
    });
}
