use soa_odata::{Paginate, QueryOptions};

use crate::config::PaginationConfig;
use crate::envelope::ResultEnvelope;
use crate::links::{LinkStyle, PageLinker};
use crate::model::{ACTIVE_PAGE, HIDE_CLASS, PageLink, PaginatedResult, PaginationModel};

/// Anything a page request can be read from: the pagination parameters
/// themselves or a whole query carrying them.
pub trait PageSource {
    fn paginate(&self) -> Option<&Paginate>;
}

impl PageSource for Paginate {
    fn paginate(&self) -> Option<&Paginate> {
        Some(self)
    }
}

impl PageSource for QueryOptions {
    fn paginate(&self) -> Option<&Paginate> {
        self.paginate.as_ref()
    }
}

/// Computes [`PaginationModel`]s. Pure: equal inputs give equal output.
#[derive(Debug, Clone, Default)]
pub struct PaginationEngine {
    config: PaginationConfig,
}

impl PaginationEngine {
    #[must_use]
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Paginate `envelope` for the page requested by `params`.
    ///
    /// Never fails: a missing page is page 1, a missing or zero page size
    /// yields a single page, and out-of-range pages produce links that
    /// simply point past the result.
    #[must_use]
    pub fn get<P: PageSource + ?Sized>(&self, params: &P, envelope: ResultEnvelope) -> PaginatedResult {
        let default = Paginate::default();
        let paginate = params.paginate().unwrap_or(&default);

        let count = envelope.count();
        let page = paginate.page.unwrap_or(1);
        let page_size = paginate
            .page_size
            .map_or(0, |size| i64::try_from(size).unwrap_or(i64::MAX));

        let style = if self.config.page_query_string {
            LinkStyle::QueryString
        } else {
            LinkStyle::Path
        };
        let linker = PageLinker::new(
            style,
            paginate.base_url.as_deref().unwrap_or_default(),
            paginate.raw_url.as_deref(),
        );

        let pagination = self.model(&linker, page, page_size, count);
        tracing::debug!(
            page = pagination.page,
            page_count = pagination.page_count,
            count = pagination.count,
            "paginated result"
        );

        PaginatedResult {
            pagination,
            data: envelope.into_data(),
        }
    }

    fn model(&self, linker: &PageLinker<'_>, page: i64, page_size: i64, count: i64) -> PaginationModel {
        let page_count = page_count(count, page_size);

        let mut model = PaginationModel {
            page,
            page_count,
            prev_page: linker.url(1),
            prev_class: HIDE_CLASS.to_owned(),
            prev_page_no: None,
            next_page: linker.url(page_count),
            next_class: HIDE_CLASS.to_owned(),
            next_page_no: None,
            first_page: linker.url(1),
            last_page: linker.url(page_count),
            pages: self.window(linker, page, page_count),
            begin_record: 0,
            end_record: 0,
            count,
        };

        if page > 1 {
            let prev = page - 1;
            model.prev_class = String::new();
            model.prev_page = linker.url(prev);
            model.prev_page_no = Some(prev);
        }
        if page < page_count {
            let next = page.saturating_add(1);
            model.next_class = String::new();
            model.next_page = linker.url(next);
            model.next_page_no = Some(next);
        }
        if page == page_count {
            model.next_page.clone_from(&model.last_page);
        }

        let (begin, end) = record_range(count, page, page_size);
        model.begin_record = begin;
        model.end_record = end;
        model
    }

    /// Contiguous run of at most `spread` page links.
    ///
    /// Before page `spread` the window is anchored at page 1; from there on
    /// it is centered on the current page and clipped at the last page.
    fn window(&self, linker: &PageLinker<'_>, page: i64, page_count: i64) -> Vec<PageLink> {
        let spread = i64::from(self.config.spread).min(page_count);
        let (begin, end) = if page < spread {
            (1, spread)
        } else {
            let half = spread.div_euclid(2);
            let end = page.saturating_add(half).min(page_count);
            ((end - spread + 1).max(1), end)
        };

        (begin..=end)
            .map(|n| PageLink {
                page: n,
                page_url: linker.url(n),
                active_page: (n == page).then(|| ACTIVE_PAGE.to_owned()),
            })
            .collect()
    }
}

fn page_count(count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    let full = count.div_euclid(page_size);
    let pages = if count.rem_euclid(page_size) > 0 {
        full + 1
    } else {
        full
    };
    pages.max(1)
}

fn record_range(count: i64, page: i64, page_size: i64) -> (i64, i64) {
    let begin = if count == 0 {
        0
    } else {
        page.saturating_sub(1).saturating_mul(page_size).saturating_add(1)
    };
    let end = page.saturating_mul(page_size).min(count);
    (begin, end)
}
