use crate::category::Category;
use crate::message::ServerMessage;
use crate::widget::{DrawCtx, Widget, WidgetKind};
use glam::DVec3;
use opdeck_core::{ElementId, Link, MarkerFactory, Outbox, Request, Surface, Value};
use opdeck_form::FieldDecl;
use opdeck_plot::{Plot, PlotSurface};
use rustc_hash::FxHashMap;

/// Resolves a widget by identity and kind, yielding the concrete type.
/// `resolve` never returns a mismatched variant, so the fallthrough is a
/// programming-contract violation, not a runtime condition.
macro_rules! widget_as {
    ($root:expr, $id:expr, $kind:ident) => {
        match $root.resolve($id, WidgetKind::$kind) {
            Widget::$kind(widget) => widget,
            _ => unreachable!("resolve() returns the declared kind"),
        }
    };
}

/// Cursor into the form currently receiving declarations: the form's
/// identity plus the name path of open nested containers.
struct FormCursor {
    form: ElementId,
    path: Vec<String>,
}

/// The client façade: applies the authority's message stream to the widget
/// tree and plot set, and funnels operator commits back out through one
/// fire-and-forget primitive.
pub struct Client {
    root: Category,
    data: Value,
    cursor: Option<FormCursor>,
    active_plots: FxHashMap<u64, Plot>,
    inactive_plots: Vec<Plot>,
    next_plot_uid: u64,
    markers: Box<dyn MarkerFactory>,
    outbox: Outbox,
}

impl Client {
    pub fn new(markers: Box<dyn MarkerFactory>) -> Self {
        Self {
            root: Category::root(),
            data: Value::empty_map(),
            cursor: None,
            active_plots: FxHashMap::default(),
            inactive_plots: Vec::new(),
            next_plot_uid: 0,
            markers,
            outbox: Outbox::new(),
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Looks up a widget without creating it.
    pub fn widget(&self, id: &ElementId) -> Option<&Widget> {
        let mut category = &self.root;
        for name in &id.category {
            category = category.category(name)?;
        }
        category.widget(&id.name)
    }

    /// Applies one tick's batch in delivery order, bracketed by the liveness
    /// protocol: widgets no message referenced are pruned afterwards.
    pub fn apply_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = ServerMessage>,
    {
        self.root.mark_unseen();
        for message in batch {
            self.apply(message);
        }
        self.root.prune_unseen();
    }

    /// Applies a single message. Wrong-kind widgets are silently replaced;
    /// messages for unknown plots are dropped.
    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Data { data } => self.data = data,
            ServerMessage::Label { id, text } => {
                widget_as!(self.root, &id, Label).data(text);
            }
            ServerMessage::ArrayLabel { id, labels, data } => {
                widget_as!(self.root, &id, ArrayLabel).data(labels, data);
            }
            ServerMessage::Button { id } => {
                self.root.resolve(&id, WidgetKind::Button);
            }
            ServerMessage::Checkbox { id, state } => {
                widget_as!(self.root, &id, Checkbox).data(state);
            }
            ServerMessage::StringInput { id, data } => {
                widget_as!(self.root, &id, StringInput).data(data);
            }
            ServerMessage::IntegerInput { id, data } => {
                widget_as!(self.root, &id, IntegerInput).data(data);
            }
            ServerMessage::NumberInput { id, data } => {
                widget_as!(self.root, &id, NumberInput).data(data);
            }
            ServerMessage::NumberSlider { id, data, min, max } => {
                widget_as!(self.root, &id, NumberSlider).data(data, min, max);
            }
            ServerMessage::ArrayInput { id, labels, data } => {
                widget_as!(self.root, &id, ArrayInput).data(labels, data);
            }
            ServerMessage::ComboInput { id, values, data } => {
                widget_as!(self.root, &id, Combo).data(values, data);
            }
            ServerMessage::DataComboInput {
                id,
                reference,
                data,
            } => {
                let values = self.resolve_reference(&reference);
                widget_as!(self.root, &id, DataCombo).data(reference, values, data);
            }
            ServerMessage::TableStart { id, header } => {
                widget_as!(self.root, &id, Table).start(header);
            }
            ServerMessage::TableRow { id, data } => {
                widget_as!(self.root, &id, Table).row(data);
            }
            ServerMessage::TableEnd { id } => {
                widget_as!(self.root, &id, Table).end();
            }
            ServerMessage::Form { id } => {
                self.root.resolve(&id, WidgetKind::Form);
                self.cursor = Some(FormCursor {
                    form: id,
                    path: Vec::new(),
                });
            }
            ServerMessage::FormCheckbox {
                form,
                name,
                required,
                default,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Checkbox {
                    default: Some(default),
                },
            ),
            ServerMessage::FormIntegerInput {
                form,
                name,
                required,
                default,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Integer {
                    default: Some(default),
                },
            ),
            ServerMessage::FormNumberInput {
                form,
                name,
                required,
                default,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Number {
                    default: Some(default),
                },
            ),
            ServerMessage::FormStringInput {
                form,
                name,
                required,
                default,
            } => {
                let default = (!default.is_empty()).then_some(default);
                self.form_declare(form, &name, required, FieldDecl::Text { default });
            }
            ServerMessage::FormArrayInput {
                form,
                name,
                required,
                labels,
                default,
                fixed_size,
            } => {
                let default = (!default.is_empty()).then_some(default);
                self.form_declare(
                    form,
                    &name,
                    required,
                    FieldDecl::Vector {
                        labels,
                        default,
                        fixed_size,
                    },
                );
            }
            ServerMessage::FormComboInput {
                form,
                name,
                required,
                values,
                send_index,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Combo { values, send_index },
            ),
            ServerMessage::FormDataComboInput {
                form,
                name,
                required,
                reference,
                send_index,
            } => {
                let values = self.resolve_reference(&reference);
                self.form_declare(
                    form,
                    &name,
                    required,
                    FieldDecl::DataCombo { values, send_index },
                );
            }
            ServerMessage::FormPoint3dInput {
                form,
                name,
                required,
                default,
                interactive,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Point3d {
                    default: Some(DVec3::from_array(default)),
                    interactive,
                },
            ),
            ServerMessage::FormRotationInput {
                form,
                name,
                required,
                default,
                interactive,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Rotation {
                    default: Some(default),
                    interactive,
                },
            ),
            ServerMessage::FormTransformInput {
                form,
                name,
                required,
                default,
                interactive,
            } => self.form_declare(
                form,
                &name,
                required,
                FieldDecl::Transform {
                    default: Some(default),
                    interactive,
                },
            ),
            ServerMessage::FormObjectBegin { name, required } => {
                self.begin_container(name, required, FieldDecl::Object);
            }
            ServerMessage::FormObjectEnd => self.end_container(),
            ServerMessage::FormObjectArrayBegin { name, required } => {
                self.begin_container(name, required, FieldDecl::ObjectArray);
            }
            ServerMessage::FormObjectArrayEnd => self.end_container(),
            ServerMessage::FormGenericArrayBegin {
                name,
                required,
                data,
            } => {
                self.begin_container(name, required, FieldDecl::GenericArray { data });
            }
            ServerMessage::FormGenericArrayEnd => self.end_container(),
            ServerMessage::FormOneOfBegin {
                name,
                required,
                data,
            } => {
                self.begin_container(name, required, FieldDecl::OneOf { data });
            }
            ServerMessage::FormOneOfEnd => self.end_container(),
            ServerMessage::StartPlot { id, title } => {
                if !self.active_plots.contains_key(&id) {
                    let uid = self.next_plot_uid;
                    self.next_plot_uid += 1;
                    self.active_plots.insert(id, Plot::new(uid, title));
                }
            }
            ServerMessage::PlotSetupXAxis { id, label, range } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.setup_xaxis(label, range);
                }
            }
            ServerMessage::PlotSetupYAxisLeft { id, label, range } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.setup_yaxis_left(label, range);
                }
            }
            ServerMessage::PlotSetupYAxisRight { id, label, range } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.setup_yaxis_right(label, range);
                }
            }
            ServerMessage::PlotPoint {
                id,
                dataset,
                label,
                x,
                y,
                color,
                style,
                side,
            } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.add_point(dataset, label, x, y, color, style, side);
                }
            }
            ServerMessage::PlotPolygon {
                id,
                dataset,
                label,
                polygon,
                side,
            } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.set_polygon(dataset, label, polygon, side);
                }
            }
            ServerMessage::PlotPolygons {
                id,
                dataset,
                label,
                polygons,
                side,
            } => {
                if let Some(plot) = self.plot_mut(id) {
                    plot.set_polygons(dataset, label, polygons, side);
                }
            }
            ServerMessage::EndPlot { id } => match self.active_plots.remove(&id) {
                Some(plot) => self.inactive_plots.push(plot),
                None => log::trace!("end for unknown plot {id}, dropped"),
            },
        }
    }

    fn plot_mut(&mut self, id: u64) -> Option<&mut Plot> {
        let plot = self.active_plots.get_mut(&id);
        if plot.is_none() {
            log::trace!("update for unknown plot {id}, dropped");
        }
        plot
    }

    /// Declares one field on a form. Declarations for the form currently
    /// under the cursor land in its innermost open container; anything else
    /// lands at that form's root.
    fn form_declare(&mut self, form: ElementId, name: &str, required: bool, decl: FieldDecl) {
        let path = match &self.cursor {
            Some(cursor) if cursor.form == form => cursor.path.clone(),
            _ => Vec::new(),
        };
        let Client { root, markers, .. } = self;
        let Widget::Form(widget) = root.resolve(&form, WidgetKind::Form) else {
            unreachable!("resolve() returns the declared kind");
        };
        widget.declare(&path, name, required, decl, markers.as_mut());
    }

    /// Opens a nested container declaration. Requires an active form; being
    /// called without one is a protocol-level logic error.
    fn begin_container(&mut self, name: String, required: bool, decl: FieldDecl) {
        let form = self
            .cursor
            .as_ref()
            .expect("container declaration with no active form")
            .form
            .clone();
        self.form_declare(form, &name, required, decl);
        self.cursor
            .as_mut()
            .expect("container declaration with no active form")
            .path
            .push(name);
    }

    fn end_container(&mut self) {
        self.cursor
            .as_mut()
            .expect("container end with no active form")
            .path
            .pop()
            .expect("container end with no open container");
    }

    fn resolve_reference(&self, reference: &[String]) -> Vec<String> {
        self.data
            .lookup(reference)
            .and_then(|value| value.as_array().ok())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_str().ok().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Walks the tree against the rendering surface. Commits queued by
    /// widgets stay in the outbox until [`Client::flush`].
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        let Client {
            root,
            markers,
            outbox,
            ..
        } = self;
        let mut ctx = DrawCtx {
            outbox,
            markers: markers.as_mut(),
        };
        root.draw(surface, &mut ctx);
    }

    /// Draws active plots, then retired ones (still visible, no longer fed).
    pub fn draw_plots(&mut self, surface: &mut dyn PlotSurface) {
        for plot in self.active_plots.values_mut() {
            plot.render(surface);
        }
        for plot in &mut self.inactive_plots {
            plot.render(surface);
        }
    }

    pub fn draw_3d(&mut self) {
        self.root.draw_3d();
    }

    /// Sends every queued commit over the transport, in queue order.
    pub fn flush(&mut self, link: &mut dyn Link) {
        self.outbox.flush(link);
    }

    /// Drains queued commits without a transport; used by embedders that
    /// batch sends themselves.
    pub fn drain_requests(&mut self) -> Vec<Request> {
        self.outbox.drain()
    }

    /// Drops every element, plot, and pending cursor.
    pub fn clear(&mut self) {
        self.root = Category::root();
        self.cursor = None;
        self.active_plots.clear();
        self.inactive_plots.clear();
    }
}
