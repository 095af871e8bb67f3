use dioxus::prelude::*;

use crate::components::app_view::AppView;

const NAV_HISTORY_LIMIT: usize = 64;

/// Pushes `previous` onto `stack`, dropping the oldest entry past the limit.
fn push_capped<T>(stack: &mut Vec<T>, previous: T) {
    stack.push(previous);
    if stack.len() > NAV_HISTORY_LIMIT {
        stack.remove(0);
    }
}

#[derive(Clone, Copy)]
pub struct Navigation {
    current_view: Signal<AppView>,
    history: Signal<Vec<AppView>>,
}

impl Navigation {
    pub fn new(current_view: Signal<AppView>, history: Signal<Vec<AppView>>) -> Self {
        Self {
            current_view,
            history,
        }
    }

    pub fn navigate_to(&self, target: AppView) {
        let mut current_view = self.current_view;
        let previous = current_view.cloned();
        if previous == target {
            return;
        }

        let mut history = self.history;
        history.with_mut(|stack| push_capped(stack, previous));
        current_view.set(target);
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.read().is_empty()
    }

    pub fn go_back(&self) -> Option<AppView> {
        let mut history = self.history;
        let prev = history.write().pop();
        prev.map(|prev| {
            let mut current_view = self.current_view;
            current_view.set(prev.clone());
            prev
        })
    }
}
