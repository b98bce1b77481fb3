// Android framework view classes that ship with the platform rather than the APK,
// so their superclasses never show up in an app's smali.

pub const FRAMEWORK_SUPERCLASSES: &[(&str, &str)] = &[
    // android.view
    ("android.view.View", "java.lang.Object"),
    ("android.view.ViewGroup", "android.view.View"),
    ("android.view.SurfaceView", "android.view.View"),
    ("android.view.TextureView", "android.view.View"),
    ("android.view.ViewStub", "android.view.View"),
    // android.webkit / android.app
    ("android.webkit.WebView", "android.widget.AbsoluteLayout"),
    ("android.app.ActivityView", "android.view.ViewGroup"),
    // text
    ("android.widget.TextView", "android.view.View"),
    ("android.widget.CheckedTextView", "android.widget.TextView"),
    ("android.widget.Chronometer", "android.widget.TextView"),
    ("android.widget.TextClock", "android.widget.TextView"),
    ("android.widget.DigitalClock", "android.widget.TextView"),
    ("android.widget.EditText", "android.widget.TextView"),
    ("android.widget.AutoCompleteTextView", "android.widget.EditText"),
    ("android.widget.MultiAutoCompleteTextView", "android.widget.AutoCompleteTextView"),
    ("android.widget.ExtractEditText", "android.widget.EditText"),
    // buttons
    ("android.widget.Button", "android.widget.TextView"),
    ("android.widget.CompoundButton", "android.widget.Button"),
    ("android.widget.CheckBox", "android.widget.CompoundButton"),
    ("android.widget.RadioButton", "android.widget.CompoundButton"),
    ("android.widget.Switch", "android.widget.CompoundButton"),
    ("android.widget.ToggleButton", "android.widget.CompoundButton"),
    // images
    ("android.widget.ImageView", "android.view.View"),
    ("android.widget.ImageButton", "android.widget.ImageView"),
    ("android.widget.QuickContactBadge", "android.widget.ImageView"),
    ("android.widget.ZoomButton", "android.widget.ImageButton"),
    // progress
    ("android.widget.ProgressBar", "android.view.View"),
    ("android.widget.AbsSeekBar", "android.widget.ProgressBar"),
    ("android.widget.SeekBar", "android.widget.AbsSeekBar"),
    ("android.widget.RatingBar", "android.widget.AbsSeekBar"),
    ("android.widget.Space", "android.view.View"),
    // containers
    ("android.widget.LinearLayout", "android.view.ViewGroup"),
    ("android.widget.RelativeLayout", "android.view.ViewGroup"),
    ("android.widget.FrameLayout", "android.view.ViewGroup"),
    ("android.widget.AbsoluteLayout", "android.view.ViewGroup"),
    ("android.widget.GridLayout", "android.view.ViewGroup"),
    ("android.widget.TableLayout", "android.widget.LinearLayout"),
    ("android.widget.TableRow", "android.widget.LinearLayout"),
    ("android.widget.RadioGroup", "android.widget.LinearLayout"),
    ("android.widget.ScrollView", "android.widget.FrameLayout"),
    ("android.widget.HorizontalScrollView", "android.widget.FrameLayout"),
    ("android.widget.ViewAnimator", "android.widget.FrameLayout"),
    ("android.widget.ViewFlipper", "android.widget.ViewAnimator"),
    ("android.widget.ViewSwitcher", "android.widget.ViewAnimator"),
    ("android.widget.ImageSwitcher", "android.widget.ViewSwitcher"),
    ("android.widget.TextSwitcher", "android.widget.ViewSwitcher"),
    ("android.widget.TabHost", "android.widget.FrameLayout"),
    ("android.widget.TabWidget", "android.widget.LinearLayout"),
    ("android.widget.DatePicker", "android.widget.FrameLayout"),
    ("android.widget.TimePicker", "android.widget.FrameLayout"),
    ("android.widget.CalendarView", "android.widget.FrameLayout"),
    ("android.widget.NumberPicker", "android.widget.LinearLayout"),
    ("android.widget.SearchView", "android.widget.LinearLayout"),
    ("android.widget.ActionMenuView", "android.widget.LinearLayout"),
    ("android.widget.ZoomControls", "android.widget.LinearLayout"),
    ("android.widget.MediaController", "android.widget.FrameLayout"),
    ("android.widget.VideoView", "android.view.SurfaceView"),
    ("android.widget.Toolbar", "android.view.ViewGroup"),
    // adapter views
    ("android.widget.AdapterView", "android.view.ViewGroup"),
    ("android.widget.AbsListView", "android.widget.AdapterView"),
    ("android.widget.ListView", "android.widget.AbsListView"),
    ("android.widget.GridView", "android.widget.AbsListView"),
    ("android.widget.ExpandableListView", "android.widget.ListView"),
    ("android.widget.AbsSpinner", "android.widget.AdapterView"),
    ("android.widget.Spinner", "android.widget.AbsSpinner"),
    ("android.widget.Gallery", "android.widget.AbsSpinner"),
    ("android.widget.AdapterViewAnimator", "android.widget.AdapterView"),
    ("android.widget.AdapterViewFlipper", "android.widget.AdapterViewAnimator"),
    ("android.widget.StackView", "android.widget.AdapterViewAnimator"),
];
