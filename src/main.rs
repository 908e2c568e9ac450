//! hovertip demo
//!
//! Replays a scripted pointer session against the headless toolkit: a list
//! with a follow-mouse tooltip and a button with an anchored tooltip. Run with
//! `RUST_LOG=trace` to also see every reposition.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::Duration;

    use hovertip::constants::DEFAULT_DELAY_MS;
    use hovertip::prelude::*;
    use hovertip::{HeadlessToolkit, WidgetId};
    use serde_json::json;

    /// Scripted pointer input.
    #[derive(Debug, Clone, Copy)]
    enum Step {
        MoveTo(i32, i32),
        Wait(u64),
        Press,
    }

    /// Turns raw pointer input into the enter/leave/motion notifications a
    /// real toolkit would deliver.
    struct Session {
        tk: HeadlessToolkit,
        registry: TooltipRegistry<HeadlessToolkit>,
        hovered: Option<WidgetId>,
    }

    impl Session {
        fn run(&mut self, steps: &[Step]) {
            for step in steps {
                match *step {
                    Step::MoveTo(x, y) => self.move_to(Point::new(x, y)),
                    Step::Wait(ms) => self.wait(ms),
                    Step::Press => self.press(),
                }
            }
        }

        fn move_to(&mut self, point: Point) {
            self.tk.set_pointer(point);
            let target = self.tk.widget_at(point);

            if target == self.hovered {
                if let Some(widget) = target {
                    self.registry.dispatch(&mut self.tk, widget, EventKind::Motion);
                }
                return;
            }

            if let Some(old) = self.hovered {
                self.registry.dispatch(&mut self.tk, old, EventKind::Leave);
            }
            if let Some(new) = target {
                self.registry.dispatch(&mut self.tk, new, EventKind::Enter);
            }
            self.hovered = target;
        }

        fn wait(&mut self, ms: u64) {
            for timer in self.tk.advance(Duration::from_millis(ms)) {
                self.registry.timer_fired(&mut self.tk, timer);
            }
            self.report();
        }

        fn press(&mut self) {
            if let Some(widget) = self.hovered {
                self.registry
                    .dispatch(&mut self.tk, widget, EventKind::ButtonPress);
            }
        }

        fn report(&self) {
            let visible = self.tk.visible_popups();
            if visible.is_empty() {
                log::info!("[{:>5} ms] no tooltip visible", self.tk.now().as_millis());
            }
            for popup in visible {
                let text = popup.content.as_ref().map_or("", |c| c.text.as_str());
                log::info!(
                    "[{:>5} ms] tooltip {:?} at {:?}: {:?}",
                    self.tk.now().as_millis(),
                    popup.requested_size,
                    popup.position,
                    text
                );
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();

        let mut tk = HeadlessToolkit::new(Size::new(1280, 800));
        let listbox = tk.add_widget(Rect::new(540, 200, 200, 340));
        let button = tk.add_widget(Rect::new(600, 760, 80, 26));

        let mut registry = TooltipRegistry::new();
        registry.attach(
            &mut tk,
            listbox,
            "I'm a tooltip with follow_mouse set to 1, so I won't be placed outside my parent",
            DEFAULT_DELAY_MS,
            OptionsPatch::new().follow_mouse(true),
        );
        let button_tip = registry.attach(
            &mut tk,
            button,
            "Enough of this",
            DEFAULT_DELAY_MS,
            OptionsPatch::new(),
        );

        let mut session = Session {
            tk,
            registry,
            hovered: None,
        };

        log::info!("Hovering the list");
        session.run(&[
            Step::MoveTo(600, 300),
            Step::Wait(1000),
            Step::MoveTo(610, 310),
            Step::Wait(600),
            Step::MoveTo(700, 520),
            Step::Wait(10),
        ]);

        log::info!("Brushing past the button");
        session.run(&[
            Step::MoveTo(640, 770),
            Step::Wait(800),
            Step::MoveTo(640, 600),
            Step::Wait(2000),
        ]);

        log::info!("Resting on the button, then clicking it");
        session.run(&[
            Step::MoveTo(640, 770),
            Step::Wait(1600),
            Step::Press,
            Step::Wait(10),
        ]);

        log::info!("Reconfiguring the button tooltip");
        if let Err(e) = session
            .registry
            .configure_dynamic(button_tip, [("bg", json!("white")), ("foo", json!(1))])
        {
            log::warn!("Rejected configuration: {}", e);
        }
        session.registry.configure_dynamic(
            button_tip,
            [("text", json!("Quit the demo")), ("delay", json!(300))],
        )?;
        session.run(&[
            Step::MoveTo(640, 600),
            Step::MoveTo(645, 772),
            Step::Wait(300),
        ]);

        let Session {
            mut tk,
            mut registry,
            ..
        } = session;
        let detached = registry.widget_destroyed(&mut tk, button);
        tk.remove_widget(button);
        log::info!(
            "Button destroyed, {} tooltip(s) detached, {} remaining",
            detached,
            registry.len()
        );

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
