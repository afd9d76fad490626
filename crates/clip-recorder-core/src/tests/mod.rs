#[cfg(feature = "gstreamer")]
mod gst_capture;
mod support;
mod view;
