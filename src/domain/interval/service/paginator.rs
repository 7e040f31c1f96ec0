use crate::domain::common::model::Page;

/// `ceil(len / page_size)`; a page size of zero is treated as one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Returns page `page_index` of `items`.
///
/// Negative indices clamp to 0. An index past the last page yields an
/// empty page instead of an error.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_index: i64) -> Page<T> {
    let page_size = page_size.max(1);
    let page_index = page_index.max(0) as usize;
    let total = total_pages(items.len(), page_size);

    let offset = page_index.saturating_mul(page_size);
    let page_items = if page_index < total {
        let end = (offset + page_size).min(items.len());
        items[offset..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        page_index,
        page_size,
        total_pages: total,
        total_items: items.len(),
        offset,
        items: page_items,
    }
}

/// Every page in order; concatenating their items reproduces `items`.
pub fn all_pages<T: Clone>(items: &[T], page_size: usize) -> Vec<Page<T>> {
    (0..total_pages(items.len(), page_size))
        .map(|idx| paginate(items, page_size, idx as i64))
        .collect()
}
