pub mod resettable;
