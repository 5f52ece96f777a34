//! Нормализованное состояние коллекций сниппетов.
//!
//! Все записи лежат в одной map «id → сниппет», а ленты (публичная, мои,
//! сохранённые) держат только упорядоченные списки id и серверные
//! метаданные пагинации. Удаление или обновление меняет map один раз и
//! сразу видно во всех лентах.

use std::collections::HashMap;

use crate::models::{PaginationMeta, Snippet, SnippetPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Feed {
    Home,
    Mine,
    Saved,
}

/// Одна лента: id текущей страницы плюс номер последнего выданного и
/// последнего применённого запроса.
///
/// Номер запроса защищает от гонки ответов: применяется только ответ
/// самого позднего запроса, опоздавшие ответы отбрасываются.
#[derive(Debug, Clone, Default)]
struct ResultSlot {
    ids: Vec<i64>,
    pagination: Option<PaginationMeta>,
    loading: bool,
    issued: u64,
    applied: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Collections {
    by_id: HashMap<i64, Snippet>,
    home: ResultSlot,
    mine: ResultSlot,
    saved: ResultSlot,
    selected: Option<i64>,
    saved_marks: HashMap<i64, bool>,
}

impl Collections {
    fn slot(&self, feed: Feed) -> &ResultSlot {
        match feed {
            Feed::Home => &self.home,
            Feed::Mine => &self.mine,
            Feed::Saved => &self.saved,
        }
    }

    fn slot_mut(&mut self, feed: Feed) -> &mut ResultSlot {
        match feed {
            Feed::Home => &mut self.home,
            Feed::Mine => &mut self.mine,
            Feed::Saved => &mut self.saved,
        }
    }

    /// Начинает загрузку ленты и возвращает номер запроса.
    pub(crate) fn begin_fetch(&mut self, feed: Feed) -> u64 {
        let slot = self.slot_mut(feed);
        slot.issued += 1;
        slot.loading = true;
        slot.issued
    }

    /// Применяет страницу ответа, если запрос всё ещё последний.
    ///
    /// Лента заменяется целиком; метаданные пагинации берутся с сервера
    /// как есть. Возвращает `false` для опоздавшего ответа.
    pub(crate) fn apply_page(&mut self, feed: Feed, ticket: u64, page: SnippetPage) -> bool {
        if self.slot(feed).issued != ticket {
            return false;
        }

        let mut ids = Vec::with_capacity(page.snippets.len());
        for snippet in page.snippets {
            ids.push(snippet.id);
            self.by_id.insert(snippet.id, snippet);
        }

        let slot = self.slot_mut(feed);
        slot.ids = ids;
        slot.pagination = Some(page.pagination);
        slot.loading = false;
        slot.applied = ticket;
        true
    }

    /// Завершает неудачную загрузку, если запрос всё ещё последний.
    pub(crate) fn fail_fetch(&mut self, feed: Feed, ticket: u64) -> bool {
        let slot = self.slot_mut(feed);
        if slot.issued != ticket {
            return false;
        }
        slot.loading = false;
        true
    }

    /// Сниппеты ленты в порядке, выданном сервером.
    pub(crate) fn feed_snippets(&self, feed: Feed) -> Vec<Snippet> {
        self.slot(feed)
            .ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .cloned()
            .collect()
    }

    pub(crate) fn pagination(&self, feed: Feed) -> Option<PaginationMeta> {
        self.slot(feed).pagination
    }

    pub(crate) fn is_loading(&self, feed: Feed) -> bool {
        self.slot(feed).loading
    }

    /// Кладёт сниппет в map и делает его выбранным.
    pub(crate) fn select(&mut self, snippet: Snippet) {
        self.selected = Some(snippet.id);
        self.by_id.insert(snippet.id, snippet);
    }

    pub(crate) fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub(crate) fn selected(&self) -> Option<&Snippet> {
        self.selected.and_then(|id| self.by_id.get(&id))
    }

    /// Обновляет запись в общей map: новая версия сразу видна во всех
    /// лентах, где сниппет присутствует.
    pub(crate) fn upsert(&mut self, snippet: Snippet) {
        self.by_id.insert(snippet.id, snippet);
    }

    /// Удаляет сниппет из map и из всех лент разом.
    pub(crate) fn remove(&mut self, id: i64) {
        self.by_id.remove(&id);
        self.home.ids.retain(|kept| *kept != id);
        self.mine.ids.retain(|kept| *kept != id);
        self.saved.ids.retain(|kept| *kept != id);
        self.saved_marks.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Локальная отметка «сохранён» на карточке.
    ///
    /// Сама лента сохранённых при этом не меняется до следующей загрузки.
    pub(crate) fn mark_saved(&mut self, id: i64, saved: bool) {
        self.saved_marks.insert(id, saved);
    }

    pub(crate) fn is_marked_saved(&self, id: i64) -> bool {
        self.saved_marks.get(&id).copied().unwrap_or(false)
    }
}
