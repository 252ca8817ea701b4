pub mod room_registry;
