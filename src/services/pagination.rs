/// Validated pagination input. Validation happens at the web boundary; by
/// the time this struct exists, `page >= 1` and `per_page` is in range.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl<T> Page<T> {
    /// Same page metadata, different item payload. Used when the service
    /// swaps raw rows for assembled views after slicing.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
        }
    }
}

/// Slices an already-filtered, already-ordered result set into one page.
/// `from`/`to` are 1-based item positions, null on an empty page.
pub fn paginate<T>(all: Vec<T>, params: PageParams) -> Page<T> {
    let total = all.len() as i64;
    let last_page = if total == 0 {
        1
    } else {
        (total + params.per_page - 1) / params.per_page
    };

    let offset = (params.page - 1) * params.per_page;
    let items: Vec<T> = all
        .into_iter()
        .skip(offset as usize)
        .take(params.per_page as usize)
        .collect();

    let from = if items.is_empty() { None } else { Some(offset + 1) };
    let to = from.map(|first| first + items.len() as i64 - 1);

    Page {
        items,
        current_page: params.page,
        per_page: params.per_page,
        total,
        last_page,
        from,
        to,
    }
}
