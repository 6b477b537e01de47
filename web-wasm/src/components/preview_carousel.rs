//! ランディングのデモ結果カルーセル
//!
//! 5秒ごとに自動で送り、手動操作があれば自動送りを止める。

use gloo::timers::callback::Interval;
use leptos::prelude::*;

pub const AUTOPLAY_INTERVAL_MS: u32 = 5_000;

/// デモ用の料理
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewMeal {
    pub name: &'static str,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub image: &'static str,
}

pub const PREVIEW_MEALS: [PreviewMeal; 3] = [
    PreviewMeal {
        name: "Grilled Salmon",
        calories: 520,
        protein: 42,
        carbs: 45,
        fat: 18,
        image: "https://images.pexels.com/photos/2403220/pexels-photo-2403220.jpeg?auto=compress&cs=tinysrgb&w=400",
    },
    PreviewMeal {
        name: "Buddha Bowl",
        calories: 380,
        protein: 15,
        carbs: 58,
        fat: 12,
        image: "https://images.pexels.com/photos/1640777/pexels-photo-1640777.jpeg?auto=compress&cs=tinysrgb&w=400",
    },
    PreviewMeal {
        name: "Grilled Steak",
        calories: 580,
        protein: 48,
        carbs: 22,
        fat: 32,
        image: "https://images.pexels.com/photos/1092730/pexels-photo-1092730.jpeg?auto=compress&cs=tinysrgb&w=400",
    },
];

/// カルーセルの位置と自動送りの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    current: usize,
    len: usize,
    autoplay: bool,
}

impl CarouselState {
    pub fn new(len: usize) -> Self {
        Self {
            current: 0,
            len,
            autoplay: true,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    /// タイマーによる送り。自動送り停止後は何もしない。
    pub fn tick(&mut self) {
        if self.autoplay && self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn next(&mut self) {
        self.autoplay = false;
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        self.autoplay = false;
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        self.autoplay = false;
        if index < self.len {
            self.current = index;
        }
    }
}

#[component]
pub fn PreviewCarousel() -> impl IntoView {
    let state = RwSignal::new(CarouselState::new(PREVIEW_MEALS.len()));

    let timer = StoredValue::new_local(Some(Interval::new(AUTOPLAY_INTERVAL_MS, move || {
        state.try_update(|s| s.tick());
    })));

    // 手動操作で自動送りを止める（Intervalはdropで解除される）
    let navigate = move |action: fn(&mut CarouselState)| {
        state.update(action);
        timer.update_value(|t| {
            t.take();
        });
    };

    on_cleanup(move || {
        timer.try_update_value(|t| {
            t.take();
        });
    });

    let meal = move || PREVIEW_MEALS[state.with(|s| s.current())];

    let dots = (0..PREVIEW_MEALS.len())
        .map(|index| {
            let class = move || {
                if state.with(|s| s.current()) == index {
                    "dot active"
                } else {
                    "dot"
                }
            };
            view! {
                <button
                    class=class
                    on:click=move |_| {
                        state.update(|s| s.go_to(index));
                        timer.update_value(|t| {
                            t.take();
                        });
                    }
                />
            }
        })
        .collect_view();

    view! {
        <div class="carousel">
            <div class="carousel-grid">
                <div class="carousel-image">
                    <img src=move || meal().image alt=move || meal().name />
                    <div class="carousel-caption">
                        <p>"Your Uploaded Meal"</p>
                        <h3>{move || meal().name}</h3>
                    </div>
                </div>

                <div class="carousel-details">
                    <p class="eyebrow">"Instant Breakdown"</p>
                    <h3>"Complete Nutritional Analysis"</h3>

                    <div class="glass-card">
                        <div class="calories-row">
                            <span>"🔥 Calories"</span>
                            <span class="calories-amount">{move || meal().calories}</span>
                        </div>
                        <div class="macro-grid">
                            <div class="macro-chip macro-protein">
                                <span>"Protein"</span>
                                <p>{move || format!("{}g", meal().protein)}</p>
                            </div>
                            <div class="macro-chip macro-carbs">
                                <span>"Carbs"</span>
                                <p>{move || format!("{}g", meal().carbs)}</p>
                            </div>
                            <div class="macro-chip macro-fat">
                                <span>"Fat"</span>
                                <p>{move || format!("{}g", meal().fat)}</p>
                            </div>
                        </div>
                        <p class="muted">"Analyzed in seconds"</p>
                    </div>
                </div>
            </div>

            <div class="carousel-dots">{dots}</div>

            <div class="carousel-nav">
                <button class="nav-button" on:click=move |_| navigate(CarouselState::prev)>"‹"</button>
                <button class="nav-button" on:click=move |_| navigate(CarouselState::next)>"›"</button>
            </div>
        </div>
    }
}
