pub mod bluetooth;
pub mod usb_audio;
