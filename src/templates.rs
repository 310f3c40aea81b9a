use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{country, genre, martial_art},
    models::{Decade, MovieDetail, MovieParams, MoviePage, MovieSlug, MovieSummary, SortOption},
    pagination::{PageItem, generate_pagination},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const FALLBACK_IMAGE: &str = "/images/fallback-image.png";

/// Options offered by the movie filter bar.
#[derive(Debug)]
pub struct FilterOptions {
    pub martial_arts: Vec<martial_art::Model>,
    pub genres: Vec<genre::Model>,
    pub countries: Vec<country::Model>,
    pub decades: Vec<Decade>,
}

#[derive(Debug)]
pub struct Listing<'a> {
    pub title: &'a str,
    pub heading: &'a str,
    pub path: &'a str,
    pub params: &'a MovieParams,
    pub current_page: u64,
    pub page: &'a MoviePage,
    pub filters: Option<&'a FilterOptions>,
    pub image_base_url: &'a str,
}

/// Full image URL for a partial TMDB path, picking the smallest size bucket
/// that covers `width`.
pub fn image_url(base_url: &str, path: Option<&str>, width: u32) -> String {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return FALLBACK_IMAGE.to_string();
    };
    let size = match width {
        0..=300 => "w300",
        301..=780 => "w780",
        781..=1280 => "w1280",
        _ => "original",
    };
    format!("{base_url}/{size}{path}")
}

/// Link to `page` of a listing, keeping the other parameters. Page 1 drops
/// the `page` parameter.
pub fn page_href(path: &str, params: &MovieParams, page: u64) -> String {
    let mut pairs: Vec<(&str, String)> =
        params.retained().into_iter().map(|(k, v)| (k, v.to_string())).collect();
    if page > 1 {
        pairs.push(("page", page.to_string()));
    }

    if pairs.is_empty() {
        return path.to_string();
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

pub fn home_page(martial_arts: &[martial_art::Model]) -> String {
    page(
        "Martial Arts Movies",
        html! {
            h1 class="mb-8 text-4xl font-bold" { "Martial arts movies" }
            p class="mb-6 text-gray-600" {
                "Browse by fighting style, or "
                a class="text-blue-600 hover:text-blue-800" href="/movies" { "see every movie" }
                "."
            }
            ul class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3" {
                @for art in martial_arts {
                    li {
                        a class="block rounded-lg bg-white p-6 shadow hover:bg-gray-50" href=(format!("/martial-arts/{}", art.slug)) {
                            span class="text-lg font-semibold" { (art.name) }
                        }
                    }
                }
            }
        },
    )
}

pub fn listing_page(listing: &Listing<'_>) -> String {
    page(
        listing.title,
        html! {
            h1 class="mb-8 text-3xl font-bold sm:text-4xl" { (listing.heading) }
            (controls(listing))
            @if listing.page.movies.is_empty() {
                p class="p-2 text-lg text-gray-500" { "No movies found" }
            } @else {
                ul class="space-y-6" {
                    @for summary in &listing.page.movies {
                        (movie_card(summary, listing.image_base_url))
                    }
                }
            }
            (pagination_bar(listing.path, listing.params, listing.current_page, listing.page.total_pages))
        },
    )
}

pub fn movie_page(detail: &MovieDetail, image_base_url: &str) -> String {
    let movie = &detail.movie;
    let secondary: Vec<_> = detail.secondary_martial_arts().collect();

    page(
        &movie.title,
        html! {
            div class="relative h-[400px] w-full overflow-hidden rounded-lg bg-gray-900" {
                @if let Some(backdrop) = movie.backdrop_path.as_deref() {
                    img class="h-full w-full object-cover brightness-90" src=(image_url(image_base_url, Some(backdrop), 1920)) alt=(movie.title);
                }
                div class="absolute inset-0 flex flex-col justify-end bg-gradient-to-t from-black/70 via-black/40 to-transparent p-8 text-white" {
                    h1 class="mb-2 text-5xl font-bold" { (movie.title) }
                    @if let Some(year) = movie.release_year() {
                        p class="text-xl text-white/80" { (year) }
                    }
                }
            }

            div class="grid grid-cols-[300px_1fr] gap-8 py-8" {
                img class="w-full rounded-lg object-cover shadow-lg" src=(image_url(image_base_url, movie.poster_path.as_deref(), 300)) alt=(movie.title);

                div class="space-y-6" {
                    div {
                        h2 class="mb-3 text-2xl font-semibold" { "Overview" }
                        p class="leading-relaxed text-gray-600" { (movie.overview) }
                    }
                    div {
                        h3 class="mb-2 text-xl font-semibold" { "Primary martial art" }
                        a class="rounded bg-gray-900 px-2 py-1 text-white" href=(format!("/martial-arts/{}", detail.primary_martial_art.slug)) {
                            (detail.primary_martial_art.name)
                        }
                    }
                    @if !secondary.is_empty() {
                        div {
                            h3 class="mb-2 text-xl font-semibold" { "Also features" }
                            (badges(secondary.iter().map(|art| art.name.as_str())))
                        }
                    }
                    div {
                        h3 class="mb-2 text-xl font-semibold" { "Genres" }
                        (badges(detail.genres.iter().map(|g| g.name.as_str())))
                    }
                    div {
                        h3 class="mb-2 text-xl font-semibold" { "Countries" }
                        (badges(detail.countries.iter().map(|c| c.name.as_str())))
                    }
                }
            }
        },
    )
}

pub fn sitemap_xml(site_url: &str, martial_arts: &[martial_art::Model], movies: &[MovieSlug]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    let mut push = |loc: String, lastmod: Option<String>| {
        out.push_str("  <url><loc>");
        out.push_str(&xml_escape(&loc));
        out.push_str("</loc>");
        if let Some(lastmod) = lastmod {
            out.push_str(&format!("<lastmod>{lastmod}</lastmod>"));
        }
        out.push_str("</url>\n");
    };

    push(format!("{site_url}/"), None);
    push(format!("{site_url}/movies"), None);
    for art in martial_arts {
        push(format!("{site_url}/martial-arts/{}", art.slug), None);
    }
    for movie in movies {
        let lastmod = jiff::Timestamp::from_second(movie.updated_at).ok().map(|ts| ts.to_string());
        push(format!("{site_url}/movies/{}", movie.slug), lastmod);
    }

    out.push_str("</urlset>\n");
    out
}

pub fn not_found_page(what: &str) -> String {
    message_page("Not found", &format!("{what} not found"))
}

pub fn error_page(message: String) -> String {
    message_page("Error", &message)
}

fn message_page(title: &str, message: &str) -> String {
    page(
        title,
        html! {
            div class="mx-auto max-w-xl" {
                div class="rounded-lg bg-white p-8 shadow" {
                    h1 class="text-2xl font-bold text-gray-900" { (title) }
                    p class="mt-4 text-gray-700" { (message) }
                    a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                header class="border-b bg-white" {
                    nav class="mx-auto flex max-w-5xl gap-6 px-6 py-4" {
                        a class="font-bold" href="/" { "Martial Movies" }
                        a class="text-gray-600 hover:text-gray-900" href="/movies" { "All movies" }
                    }
                }
                main class="mx-auto max-w-5xl px-6 py-10" { (body) }
            }
        }
    }
    .into_string()
}

fn controls(listing: &Listing<'_>) -> Markup {
    let params = listing.params;
    let sort = params.sort();

    html! {
        form class="mb-6 flex flex-wrap items-end gap-4" method="get" action=(listing.path) {
            @if let Some(options) = listing.filters {
                (select_filter("martial-art", "All martial arts", params.martial_art.as_deref(),
                    options.martial_arts.iter().map(|a| (a.slug.clone(), a.name.clone()))))
                (select_filter("genre", "All genres", params.genre.as_deref(),
                    options.genres.iter().map(|g| (g.slug.clone(), g.name.clone()))))
                (select_filter("country", "All countries", params.country.as_deref(),
                    options.countries.iter().map(|c| (c.code.clone(), c.name.clone()))))
                (select_filter("year", "All years", params.year.as_deref(),
                    options.decades.iter().map(|d| (d.to_string(), d.label()))))
            }
            select class="rounded-md border border-gray-300 px-3 py-2" name="sort" {
                @for choice in SortOption::ALL {
                    option value=(choice.key()) selected[choice == sort] { (choice.label()) }
                }
            }
            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Apply" }
        }
    }
}

fn select_filter(
    name: &str,
    placeholder: &str,
    selected: Option<&str>,
    options: impl Iterator<Item = (String, String)>,
) -> Markup {
    html! {
        select class="rounded-md border border-gray-300 px-3 py-2" name=(name) {
            option value="" { (placeholder) }
            @for (value, label) in options {
                option value=(value) selected[selected == Some(value.as_str())] { (label) }
            }
        }
    }
}

fn movie_card(summary: &MovieSummary, image_base_url: &str) -> Markup {
    let movie = &summary.movie;
    html! {
        li {
            a class="flex overflow-hidden rounded-lg bg-white shadow hover:bg-gray-50" href=(format!("/movies/{}", movie.slug)) {
                img class="h-32 w-24 flex-shrink-0 object-cover" src=(image_url(image_base_url, movie.poster_path.as_deref(), 300)) alt=(movie.title);
                div class="flex flex-1 flex-col justify-center space-y-2 p-4" {
                    h2 class="text-lg font-semibold" { (movie.title) }
                    p class="text-sm text-gray-500" {
                        @if let Some(year) = movie.release_year() { (year) " · " }
                        (summary.primary_martial_art.name)
                        @for genre in &summary.genres { " · " (genre.name) }
                    }
                    p class="line-clamp-2 text-sm" { (movie.overview) }
                }
            }
        }
    }
}

fn pagination_bar(path: &str, params: &MovieParams, current: u64, total_pages: u64) -> Markup {
    let at_start = current <= 1;
    let at_end = current >= total_pages;

    html! {
        nav class="mt-8 flex items-center justify-center gap-2" aria-label="pagination" {
            @if at_start {
                span class="pointer-events-none px-3 py-1 opacity-50" aria-disabled="true" { "Previous" }
            } @else {
                a class="px-3 py-1" href=(page_href(path, params, current - 1)) { "Previous" }
            }
            @for item in generate_pagination(current, total_pages) {
                @match item {
                    PageItem::Page(number) => {
                        @if number == current {
                            a class="rounded border px-3 py-1 font-semibold" href=(page_href(path, params, number)) aria-current="page" { (number) }
                        } @else {
                            a class="px-3 py-1" href=(page_href(path, params, number)) { (number) }
                        }
                    }
                    PageItem::Ellipsis => {
                        span class="px-3 py-1" { "…" }
                    }
                }
            }
            @if at_end {
                span class="pointer-events-none px-3 py-1 opacity-50" aria-disabled="true" { "Next" }
            } @else {
                a class="px-3 py-1" href=(page_href(path, params, current + 1)) { "Next" }
            }
        }
    }
}

fn badges<'a>(names: impl Iterator<Item = &'a str>) -> Markup {
    html! {
        div class="flex flex-wrap gap-2" {
            @for name in names {
                span class="rounded border px-2 py-1 text-sm" { (name) }
            }
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
