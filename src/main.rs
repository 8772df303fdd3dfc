//! Math Challenge entry point
//!
//! Handles platform-specific initialization and wires the DOM to the core.
//! All session mutation happens through the `game` module; this file only
//! renders, routes input events, and owns the two browser timers.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use math_challenge::audio::{AudioManager, SoundEffect};
    use math_challenge::consts::{LEARN_TABLE_MAX, ROUND_FEEDBACK_MS};
    use math_challenge::game::{Difficulty, GameEvent, Mode, Question, Session};
    use math_challenge::{BestScore, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        best: BestScore,
        audio: AudioManager,
        /// Handle of the repeating 1 s countdown, when armed (timed mode)
        tick_handle: Option<i32>,
        /// Handle of the pending round-advance timeout, when armed
        advance_handle: Option<i32>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Math Challenge starting...");

        let settings = Settings::load();
        let best = BestScore::load();
        let audio = AudioManager::new(settings.sound_enabled);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(seed),
            settings,
            best,
            audio,
            tick_handle: None,
            advance_handle: None,
        }));

        log::info!("Session seeded with {}", seed);

        setup_difficulty_buttons(&game);
        setup_mode_buttons(&game);
        setup_control_buttons(&game);
        setup_keyboard(&game);

        update_sound_button(&game);
        update_best_display(&game);
        show_menu(&game);

        log::info!("Math Challenge running!");
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    // === Screen helpers ===

    /// Toggle the `active` class across the four screens
    fn set_active_screen(name: &str) {
        let document = document();
        for id in ["menu-screen", "game-screen", "result-screen", "learn-screen"] {
            if let Some(el) = document.get_element_by_id(id) {
                let active = id.starts_with(name);
                let _ = el.class_list().toggle_with_force("active", active);
            }
        }
    }

    fn show_menu(game: &Rc<RefCell<Game>>) {
        stop_countdown(game);
        cancel_advance(game);
        game.borrow_mut().session.return_to_menu();
        update_status(game);
        set_active_screen("menu");
    }

    /// The learn view bypasses the session entirely: a static products table
    fn show_learn_table() {
        let document = document();
        if let Some(table) = document.get_element_by_id("learn-table") {
            let mut html = String::new();
            html.push_str("<tr><th></th>");
            for b in 1..=LEARN_TABLE_MAX {
                html.push_str(&format!("<th>{b}</th>"));
            }
            html.push_str("</tr>");
            for a in 1..=LEARN_TABLE_MAX {
                html.push_str(&format!("<tr><th>{a}</th>"));
                for b in 1..=LEARN_TABLE_MAX {
                    html.push_str(&format!("<td>{}</td>", a * b));
                }
                html.push_str("</tr>");
            }
            table.set_inner_html(&html);
        }
        set_active_screen("learn");
    }

    // === Session flow ===

    fn start_mode(game: &Rc<RefCell<Game>>, mode: Mode) {
        stop_countdown(game);
        cancel_advance(game);

        let event = {
            let mut g = game.borrow_mut();
            // Mode buttons are a user gesture, so the context may resume now
            g.audio.resume();
            let difficulty = g.settings.difficulty;
            g.session.start(mode, difficulty)
        };

        if let GameEvent::QuestionLoaded { question, choices } = event {
            render_question(game, &question, &choices);
        }

        if mode == Mode::Timed {
            start_countdown(game);
        }

        update_status(game);
        set_active_screen("game");
        log::info!("Started {} mode", mode.as_str());
    }

    fn render_question(game: &Rc<RefCell<Game>>, question: &Question, choices: &[u32]) {
        let document = document();

        if let Some(el) = document.get_element_by_id("question") {
            el.set_text_content(Some(&question.text));
        }

        let Some(answers) = document.get_element_by_id("answers") else {
            return;
        };
        answers.set_inner_html("");

        for &value in choices {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_class_name("answer-btn");
            button.set_text_content(Some(&value.to_string()));

            let game = game.clone();
            let button_ref = button.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                handle_answer(&game, &button_ref, value);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = answers.append_child(&button);
        }
    }

    fn handle_answer(game: &Rc<RefCell<Game>>, button: &Element, value: u32) {
        let event = game.borrow_mut().session.submit_answer(value);
        let Some(GameEvent::AnswerResult { correct, answer }) = event else {
            // Dropped: feedback window, or the run already ended
            return;
        };

        if correct {
            let _ = button.class_list().add_1("correct");
        } else {
            let _ = button.class_list().add_1("wrong");
            highlight_correct_button(answer);
        }

        game.borrow()
            .audio
            .play(if correct { SoundEffect::Correct } else { SoundEffect::Wrong });

        update_status(game);
        schedule_advance(game);
    }

    /// Reveal the right button after a miss
    fn highlight_correct_button(answer: u32) {
        let document = document();
        let Ok(buttons) = document.query_selector_all(".answer-btn") else {
            return;
        };
        let text = answer.to_string();
        for i in 0..buttons.length() {
            let Some(node) = buttons.item(i) else { continue };
            if node.text_content().as_deref() == Some(&text) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    let _ = el.class_list().add_1("correct");
                }
            }
        }
    }

    fn finish_session(game: &Rc<RefCell<Game>>, final_score: u32) {
        stop_countdown(game);
        cancel_advance(game);

        let new_best = {
            let mut g = game.borrow_mut();
            let improved = g.best.record(final_score);
            if improved {
                g.best.save();
            }
            improved
        };

        game.borrow().audio.play(if new_best {
            SoundEffect::BestScore
        } else {
            SoundEffect::GameOver
        });

        let document = document();
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&final_score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("result-high") {
            el.set_text_content(Some(&game.borrow().best.score.to_string()));
        }
        update_best_display(game);
        set_active_screen("result");

        log::info!("Session ended with score {} (new best: {})", final_score, new_best);
    }

    // === Timers ===
    //
    // Each callback is tagged with the session generation current when it
    // was scheduled. A bumped generation (new round, back to menu) makes the
    // tag stale and the callback returns without touching the session.
    // Cancelling the stored handle is an optimization on top of that check.

    fn start_countdown(game: &Rc<RefCell<Game>>) {
        stop_countdown(game);

        let window = web_sys::window().unwrap();
        let generation = game.borrow().session.generation();
        let game_cb = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            if game_cb.borrow().session.generation() != generation {
                stop_countdown(&game_cb);
                return;
            }
            let event = game_cb.borrow_mut().session.tick();
            update_status(&game_cb);
            if let Some(GameEvent::SessionEnded { final_score }) = event {
                finish_session(&game_cb, final_score);
            }
        });

        if let Ok(handle) = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            )
        {
            game.borrow_mut().tick_handle = Some(handle);
        }
        closure.forget();
    }

    fn stop_countdown(game: &Rc<RefCell<Game>>) {
        if let Some(handle) = game.borrow_mut().tick_handle.take() {
            web_sys::window().unwrap().clear_interval_with_handle(handle);
        }
    }

    fn schedule_advance(game: &Rc<RefCell<Game>>) {
        cancel_advance(game);

        let window = web_sys::window().unwrap();
        let generation = game.borrow().session.generation();
        let game_cb = game.clone();
        let closure = Closure::once(move || {
            if game_cb.borrow().session.generation() != generation {
                return;
            }
            game_cb.borrow_mut().advance_handle = None;
            let event = game_cb.borrow_mut().session.advance_round();
            match event {
                Some(GameEvent::QuestionLoaded { question, choices }) => {
                    render_question(&game_cb, &question, &choices);
                    update_status(&game_cb);
                }
                Some(GameEvent::SessionEnded { final_score }) => {
                    finish_session(&game_cb, final_score);
                }
                // Dropped: the countdown already ended this session
                _ => {}
            }
        });

        if let Ok(handle) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ROUND_FEEDBACK_MS,
        ) {
            game.borrow_mut().advance_handle = Some(handle);
        }
        closure.forget();
    }

    fn cancel_advance(game: &Rc<RefCell<Game>>) {
        if let Some(handle) = game.borrow_mut().advance_handle.take() {
            web_sys::window().unwrap().clear_timeout_with_handle(handle);
        }
    }

    // === HUD ===

    fn update_status(game: &Rc<RefCell<Game>>) {
        use math_challenge::game::Phase;

        let g = game.borrow();
        let document = document();
        let idle = g.session.phase() == Phase::Idle;

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&g.session.score().to_string()));
        }
        if let Some(el) = document.get_element_by_id("mode-label") {
            let label = if idle { "-" } else { g.session.mode().as_str() };
            el.set_text_content(Some(label));
        }
        if let Some(el) = document.get_element_by_id("timer") {
            let text = if !idle && g.session.mode() == Mode::Timed {
                format!("{}s", g.session.time_left())
            } else {
                "--".to_string()
            };
            el.set_text_content(Some(&text));
        }
        if let Some(el) = document.get_element_by_id("hearts") {
            let text = if !idle && g.session.mode() == Mode::Survival {
                "❤️".repeat(g.session.lives() as usize)
            } else {
                "--".to_string()
            };
            el.set_text_content(Some(&text));
        }
    }

    fn update_best_display(game: &Rc<RefCell<Game>>) {
        if let Some(el) = document().get_element_by_id("highscore") {
            el.set_text_content(Some(&game.borrow().best.score.to_string()));
        }
    }

    fn update_sound_button(game: &Rc<RefCell<Game>>) {
        if let Some(el) = document().get_element_by_id("toggle-sound") {
            let label = if game.borrow().settings.sound_enabled {
                "Sound: On"
            } else {
                "Sound: Off"
            };
            el.set_text_content(Some(label));
        }
    }

    // === Input wiring ===

    fn setup_difficulty_buttons(game: &Rc<RefCell<Game>>) {
        let document = document();
        let Ok(buttons) = document.query_selector_all(".diff") else {
            return;
        };

        let chosen = game.borrow().settings.difficulty;
        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(difficulty) = button
                .get_attribute("data-diff")
                .and_then(|v| Difficulty::from_str(&v))
            else {
                continue;
            };

            let _ = button
                .class_list()
                .toggle_with_force("active", difficulty == chosen);

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    g.settings.difficulty = difficulty;
                    g.settings.save();
                }
                // Re-style the whole group
                let document = web_sys::window().unwrap().document().unwrap();
                if let Ok(all) = document.query_selector_all(".diff") {
                    for j in 0..all.length() {
                        if let Some(el) = all.item(j).and_then(|n| n.dyn_into::<Element>().ok()) {
                            let matches = el.get_attribute("data-diff").as_deref()
                                == Some(difficulty.as_str());
                            let _ = el.class_list().toggle_with_force("active", matches);
                        }
                    }
                }
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mode_buttons(game: &Rc<RefCell<Game>>) {
        let document = document();
        let Ok(buttons) = document.query_selector_all(".menu-buttons .btn") else {
            return;
        };

        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(tag) = button.get_attribute("data-mode") else {
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if tag == "learn" {
                    show_learn_table();
                } else if let Some(mode) = Mode::from_str(&tag) {
                    start_mode(&game, mode);
                }
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_control_buttons(game: &Rc<RefCell<Game>>) {
        let document = document();

        // Back to menu (result screen, learn screen) and mid-game quit
        for id in ["back-menu", "quit-btn", "learn-back"] {
            if let Some(button) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    show_menu(&game);
                });
                let _ =
                    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Play again restarts the mode the session just ran
        if let Some(button) = document.get_element_by_id("play-again") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mode = game.borrow().session.mode();
                start_mode(&game, mode);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sound toggle
        if let Some(button) = document.get_element_by_id("toggle-sound") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    g.settings.sound_enabled = !g.settings.sound_enabled;
                    let enabled = g.settings.sound_enabled;
                    g.audio.set_enabled(enabled);
                    g.settings.save();
                }
                update_sound_button(&game);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset best score
        if let Some(button) = document.get_element_by_id("reset-highscore") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                BestScore::reset();
                game.borrow_mut().best = BestScore::new();
                update_best_display(&game);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keys 1-4 press the corresponding answer button while playing
    fn setup_keyboard(_game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let document = web_sys::window().unwrap().document().unwrap();
            let playing = document
                .get_element_by_id("game-screen")
                .map(|el| el.class_list().contains("active"))
                .unwrap_or(false);
            if !playing {
                return;
            }
            let Some(index) = (match event.key().as_str() {
                "1" => Some(0u32),
                "2" => Some(1),
                "3" => Some(2),
                "4" => Some(3),
                _ => None,
            }) else {
                return;
            };
            if let Ok(buttons) = document.query_selector_all(".answer-btn") {
                if let Some(button) = buttons
                    .item(index)
                    .and_then(|n| n.dyn_into::<web_sys::HtmlElement>().ok())
                {
                    button.click();
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Challenge (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    println!("\nRunning core smoke test...");
    smoke_test();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test() {
    use math_challenge::game::{Difficulty, GameEvent, Mode, Session};

    let mut session = Session::new(7);
    let GameEvent::QuestionLoaded { question, choices } =
        session.start(Mode::Practice, Difficulty::Medium)
    else {
        panic!("start must load a question");
    };
    assert!(choices.contains(&question.answer));
    assert!(session.accepting_input());

    let result = session.submit_answer(question.answer);
    assert!(matches!(
        result,
        Some(GameEvent::AnswerResult { correct: true, .. })
    ));
    assert_eq!(session.score(), 1);

    println!("✓ Core smoke test passed! ({})", question.text);
}
