mod fps;
mod panels;
mod tooltip;
